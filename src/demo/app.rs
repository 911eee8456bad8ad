//! Demo application: a two-pane inventory transfer screen.
//!
//! Wires the transfer UI to the toy [`World`]: each pane can browse the
//! ground (with a vehicle-cargo alternate source on the same slot), a
//! backpack and worn items; confirming a selection moves the selected
//! stacks into the pile shown by the other pane. UI state persists across
//! runs.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::config::Config;
use crate::ui::components::list_view::{Column, Grouper, Sorter};
use crate::ui::components::source_view::{SourceEntry, SourceRef, SourcedListView};
use crate::ui::components::transfer_view::{TransferUi, UiEvent, LEFT, RIGHT};
use crate::ui::core::actions::Action;
use crate::ui::core::state::TransferSaveState;

use super::items::{Item, Pile, World};

/// Run the demo transfer screen until the user quits.
pub fn run(config: &Config) -> Result<()> {
    // Terminal initialization
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if config.ui.mouse_enabled {
        execute!(std::io::stdout(), EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let world = Rc::new(RefCell::new(World::sample()));
    let mut ui = build_ui(&world, config);

    let state_path = Config::state_file_path()?;
    let saved = TransferSaveState::load_or_default(&state_path);
    if saved.initialized {
        ui.load_state(&saved, true);
    }

    let res = ui.show(&mut terminal);

    if let Err(e) = ui.save_state().save(&state_path) {
        log::warn!("failed to save UI state: {e}");
    }

    // Cleanup
    disable_raw_mode()?;
    if config.ui.mouse_enabled {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

/// Build the dual-pane UI over the shared world.
pub fn build_ui(world: &Rc<RefCell<World>>, config: &Config) -> TransferUi<Item> {
    let mut ui = TransferUi::new(config.ui.source_map_columns);
    for side in [LEFT, RIGHT] {
        let pane = if side == LEFT {
            ui.left_mut()
        } else {
            ui.right_mut()
        };
        configure_pane(pane, world);
    }
    // start the right pane on the backpack so the screen opens as
    // ground -> backpack
    ui.right_mut().set_source(1, None, true, false);

    let world_sel = Rc::clone(world);
    ui.on_select(move |ui, selections| {
        let (Some(src), Some(dst)) = (ui.cur_pane().get_source(), ui.other_pane().get_source())
        else {
            return;
        };
        let (Some(from), Some(to)) = (pile_for(&src), pile_for(&dst)) else {
            return;
        };
        if from == to {
            return;
        }
        let stacks: Vec<(String, usize)> = selections
            .iter()
            .filter_map(|sel| {
                ui.cur_pane()
                    .list()
                    .item(sel.index)
                    .map(|item| (item.name.clone(), sel.count))
            })
            .collect();
        {
            let mut world = world_sel.borrow_mut();
            for (name, count) in &stacks {
                world.move_items(from, to, name, *count);
            }
        }
        log::debug!("moved {} stacks from {from:?} to {to:?}", stacks.len());
        ui.cur_pane_mut().rebuild();
        ui.other_pane_mut().rebuild();
    });

    ui.on_input(move |ui, action| {
        let switched_source = matches!(
            action,
            Action::Source(_)
                | Action::CycleSources
                | Action::NextSlot
                | Action::PrevSlot
                | Action::MouseSelect(..)
        );
        if !switched_source {
            return;
        }
        // switching the focused pane onto the source the other pane already
        // shows would make transfers degenerate; undo the switch and swap
        // the panes instead, so the requested view ends up on the focused
        // side
        let (Some(cur), Some(other)) = (ui.cur_pane().get_source(), ui.other_pane().get_source())
        else {
            return;
        };
        if cur.available && other.available && cur.same_binding(&other) {
            if let Some(prev) = ui.cur_pane().get_source_prev() {
                ui.cur_pane_mut()
                    .set_source(prev.slot, Some(prev.icon), false, true);
            }
            ui.push_event(UiEvent::SwapPanes);
            ui.cur_pane_mut().suspend();
        }
    });

    ui
}

fn configure_pane(pane: &mut SourcedListView<Item>, world: &Rc<RefCell<World>>) {
    let list = pane.list_mut();
    list.set_columns(
        vec![
            Column::new("name", 5, |item: &Item, _| item.name.clone()),
            Column::new("amt", 2, |item: &Item, _| item.count.to_string()),
            Column::new("weight", 3, |item: &Item, width| {
                format_weight(item.total_weight(), width)
            }),
        ],
        true,
    );
    // numeric orderings replace the implicit lexicographic column sorters
    list.add_sorter(Sorter::new("amt", |a: &Item, b: &Item| a.count.cmp(&b.count)));
    list.add_sorter(Sorter::new("weight", |a: &Item, b: &Item| {
        a.total_weight().cmp(&b.total_weight())
    }));
    list.add_grouper(Grouper::new(
        "category",
        |a: &Item, b: &Item| a.category.cmp(&b.category),
        |item: &Item| item.category.label().to_string(),
    ));
    list.set_fcounting(|item: &Item| item.count);
    list.set_ffilter("item name", |item: &Item, filter: &str| {
        item.name.to_lowercase().contains(&filter.to_lowercase())
    });

    let w = Rc::clone(world);
    pane.add_source(
        0,
        SourceEntry::new(
            'g',
            || "Items on the ground".to_string(),
            move || w.borrow().snapshot(Pile::Ground),
            || true,
        ),
    );
    let w = Rc::clone(world);
    let avail = Rc::clone(world);
    pane.add_source(
        0,
        SourceEntry::new(
            'v',
            || "Vehicle cargo".to_string(),
            move || w.borrow().snapshot(Pile::VehicleCargo),
            move || avail.borrow().vehicle_present,
        ),
    );
    let w = Rc::clone(world);
    pane.add_source(
        1,
        SourceEntry::new(
            'b',
            || "Backpack".to_string(),
            move || w.borrow().snapshot(Pile::Backpack),
            || true,
        ),
    );
    let w = Rc::clone(world);
    pane.add_source(
        2,
        SourceEntry::new(
            'w',
            || "Worn items".to_string(),
            move || w.borrow().snapshot(Pile::Worn),
            || true,
        ),
    );
}

/// Map a source binding back to the pile it materializes.
pub fn pile_for(source: &SourceRef) -> Option<Pile> {
    match (source.slot, source.icon) {
        (0, 'g') => Some(Pile::Ground),
        (0, 'v') => Some(Pile::VehicleCargo),
        (1, 'b') => Some(Pile::Backpack),
        (2, 'w') => Some(Pile::Worn),
        _ => None,
    }
}

/// Render a weight in kilograms, spending as many decimals as the cell
/// allows (up to two).
fn format_weight(grams: u32, width: u16) -> String {
    let kg = f64::from(grams) / 1000.0;
    if width == 0 {
        return format!("{kg:.2}");
    }
    let width = usize::from(width);
    let digits = (kg.max(1.0).log10() as usize) + 1;
    let decimals = width.saturating_sub(digits + 1).min(2);
    format!("{kg:>width$.decimals$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pile_mapping_covers_all_sources() {
        for (slot, icon, pile) in [
            (0, 'g', Pile::Ground),
            (0, 'v', Pile::VehicleCargo),
            (1, 'b', Pile::Backpack),
            (2, 'w', Pile::Worn),
        ] {
            let source = SourceRef {
                slot,
                icon,
                available: true,
            };
            assert_eq!(pile_for(&source), Some(pile));
        }
        let unknown = SourceRef {
            slot: 7,
            icon: 'x',
            available: false,
        };
        assert_eq!(pile_for(&unknown), None);
    }

    #[test]
    fn weight_formatting_adapts_decimals() {
        assert_eq!(format_weight(1234, 0), "1.23");
        assert_eq!(format_weight(1234, 6), "  1.23");
        assert_eq!(format_weight(1234, 3), "1.2");
        assert_eq!(format_weight(650, 0), "0.65");
    }
}
