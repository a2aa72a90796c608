use std::collections::{HashMap, HashSet};

///Physical neighbours per key on a lowercase QWERTY layout
const QWERTY_NEIGHBOURS: &[(char, &str)] = &[
    ('q', "wa"),
    ('w', "qes"),
    ('e', "wrd"),
    ('r', "etf"),
    ('t', "ryg"),
    ('y', "tuh"),
    ('u', "yij"),
    ('i', "uok"),
    ('o', "ipl"),
    ('p', "ol"),
    ('a', "qsz"),
    ('s', "awdx"),
    ('d', "sefc"),
    ('f', "drgv"),
    ('g', "fthb"),
    ('h', "gyjn"),
    ('j', "hukm"),
    ('k', "jil"),
    ('l', "kop"),
    ('z', "asx"),
    ('x', "zsdc"),
    ('c', "xdfv"),
    ('v', "cfgb"),
    ('b', "vghn"),
    ('n', "bhjm"),
    ('m', "njk"),
];

///Maps each lowercase letter to the set of physically adjacent keys.
///Immutable after construction.
#[derive(Debug, Clone)]
pub struct KeyboardLayout {
    adjacency: HashMap<char, HashSet<char>>,
}

impl KeyboardLayout {
    pub fn qwerty() -> Self {
        let mut adjacency = HashMap::with_capacity(QWERTY_NEIGHBOURS.len());
        for (key, neighbours) in QWERTY_NEIGHBOURS {
            adjacency.insert(*key, neighbours.chars().collect());
        }
        KeyboardLayout { adjacency }
    }

    ///Are two keys physical neighbours? Characters outside the layout are
    ///never adjacent to anything.
    pub fn adjacent(&self, a: char, b: char) -> bool {
        self.adjacency
            .get(&a)
            .map(|neighbours| neighbours.contains(&b))
            .unwrap_or(false)
    }

    pub fn neighbours(&self, key: char) -> Option<&HashSet<char>> {
        self.adjacency.get(&key)
    }
}

impl Default for KeyboardLayout {
    fn default() -> Self {
        KeyboardLayout::qwerty()
    }
}
