use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

const ANIMALS: [&str; 12] = [
    "🐶", "🐱", "🐭", "🐹", "🐰", "🦊", "🐻", "🐼", "🐨", "🐯", "🦁", "🐮",
];
const FRUITS: [&str; 12] = [
    "🍎", "🍌", "🍇", "🍓", "🥭", "🍍", "🍒", "🍑", "🍉", "🍋", "🍊", "🍐",
];
const VEHICLES: [&str; 12] = [
    "🚗", "🚕", "🚌", "🚑", "🚲", "🏍", "🚀", "✈️", "🛳", "🚚", "🚜", "🛴",
];

/// Symbol theme a deck is drawn from.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Animals,
    Fruits,
    Vehicles,
}

impl Category {
    pub fn all() -> Vec<Category> {
        vec![Category::Animals, Category::Fruits, Category::Vehicles]
    }

    pub fn index(&self) -> usize {
        match self {
            Category::Animals => 0,
            Category::Fruits => 1,
            Category::Vehicles => 2,
        }
    }

    pub fn from_index(index: usize) -> Category {
        match index {
            1 => Category::Fruits,
            2 => Category::Vehicles,
            _ => Category::Animals,
        }
    }

    pub fn symbols(&self) -> &'static [&'static str] {
        match self {
            Category::Animals => &ANIMALS,
            Category::Fruits => &FRUITS,
            Category::Vehicles => &VEHICLES,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Animals => "animals",
            Category::Fruits => "fruits",
            Category::Vehicles => "vehicles",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Category::Animals => "Animals",
            Category::Fruits => "Fruits",
            Category::Vehicles => "Vehicles",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::all()
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}
