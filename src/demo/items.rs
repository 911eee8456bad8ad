//! Toy item model backing the demo binary.
//!
//! A [`World`] holds a few piles of stacked items the way a game would:
//! items on the ground, in a vehicle's cargo space, in a backpack, and worn.
//! The demo panes materialize snapshots of these piles and move stacks
//! between them on selection.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    Food,
    Tools,
    Clothing,
    Materials,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Tools => "Tools",
            Category::Clothing => "Clothing",
            Category::Materials => "Materials",
        }
    }
}

/// A stack of identical items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub name: String,
    pub category: Category,
    pub count: usize,
    /// Weight of a single item, in grams
    pub unit_weight: u32,
}

impl Item {
    pub fn new(name: &str, category: Category, count: usize, unit_weight: u32) -> Self {
        Self {
            name: name.to_string(),
            category,
            count,
            unit_weight,
        }
    }

    pub fn total_weight(&self) -> u32 {
        self.unit_weight * self.count as u32
    }
}

/// The piles items can live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Pile {
    Ground,
    VehicleCargo,
    Backpack,
    Worn,
}

/// Shared demo game state.
#[derive(Debug)]
pub struct World {
    piles: BTreeMap<Pile, Vec<Item>>,
    pub vehicle_present: bool,
}

impl World {
    /// A small world with items spread across all piles.
    pub fn sample() -> Self {
        let mut piles = BTreeMap::new();
        piles.insert(
            Pile::Ground,
            vec![
                Item::new("rock", Category::Materials, 1, 650),
                Item::new("rag", Category::Materials, 2, 40),
                Item::new("rope", Category::Materials, 1, 900),
                Item::new("canned beans", Category::Food, 3, 400),
                Item::new("hammer", Category::Tools, 1, 1300),
            ],
        );
        piles.insert(
            Pile::VehicleCargo,
            vec![
                Item::new("jerrycan", Category::Tools, 1, 2500),
                Item::new("plank", Category::Materials, 6, 3200),
            ],
        );
        piles.insert(
            Pile::Backpack,
            vec![
                Item::new("water bottle", Category::Food, 2, 1050),
                Item::new("screwdriver", Category::Tools, 1, 110),
                Item::new("granola bar", Category::Food, 5, 60),
            ],
        );
        piles.insert(
            Pile::Worn,
            vec![
                Item::new("wool socks", Category::Clothing, 1, 70),
                Item::new("leather gloves", Category::Clothing, 1, 160),
            ],
        );
        Self {
            piles,
            vehicle_present: true,
        }
    }

    /// A point-in-time copy of one pile, for materialization.
    pub fn snapshot(&self, pile: Pile) -> Vec<Item> {
        self.piles.get(&pile).cloned().unwrap_or_default()
    }

    /// Move up to `count` items of a named stack between piles, merging
    /// with an existing stack at the destination.
    pub fn move_items(&mut self, from: Pile, to: Pile, name: &str, count: usize) {
        if from == to || count == 0 {
            return;
        }
        let Some(source) = self.piles.get_mut(&from) else {
            return;
        };
        let Some(pos) = source.iter().position(|item| item.name == name) else {
            return;
        };
        let moved = count.min(source[pos].count);
        let mut stack = source[pos].clone();
        stack.count = moved;
        source[pos].count -= moved;
        if source[pos].count == 0 {
            source.remove(pos);
        }

        let dest = self.piles.entry(to).or_default();
        match dest.iter_mut().find(|item| item.name == name) {
            Some(existing) => existing.count += moved,
            None => dest.push(stack),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_items_merges_stacks() {
        let mut world = World::sample();
        world.move_items(Pile::Ground, Pile::Backpack, "rag", 2);
        assert!(world.snapshot(Pile::Ground).iter().all(|i| i.name != "rag"));
        let bag = world.snapshot(Pile::Backpack);
        assert_eq!(bag.iter().find(|i| i.name == "rag").map(|i| i.count), Some(2));
    }

    #[test]
    fn move_items_splits_stacks() {
        let mut world = World::sample();
        world.move_items(Pile::Ground, Pile::Worn, "canned beans", 1);
        let ground = world.snapshot(Pile::Ground);
        assert_eq!(
            ground.iter().find(|i| i.name == "canned beans").map(|i| i.count),
            Some(2)
        );
        let worn = world.snapshot(Pile::Worn);
        assert_eq!(
            worn.iter().find(|i| i.name == "canned beans").map(|i| i.count),
            Some(1)
        );
    }

    #[test]
    fn move_items_clamps_count() {
        let mut world = World::sample();
        world.move_items(Pile::Ground, Pile::Backpack, "rock", 99);
        assert_eq!(
            world
                .snapshot(Pile::Backpack)
                .iter()
                .find(|i| i.name == "rock")
                .map(|i| i.count),
            Some(1)
        );
    }
}
