//! Mesh object naming: true names, pruned names and sub-indices.

use hashbrown::HashMap;
use indexmap::IndexMap;

/// Markers that start a variant suffix (shape keys, visibility, sub-objects).
const VARIANT_MARKERS: [&str; 3] = ["Shape", "_VIS_", "_O_"];

/// Group key: the name up to the earliest variant marker.
pub fn true_name(name: &str) -> &str {
    let end = VARIANT_MARKERS
        .iter()
        .filter_map(|marker| name.find(marker))
        .min()
        .unwrap_or(name.len());
    &name[..end]
}

/// Name with the editor's `.NNN` duplicate suffix (and anything after it) removed.
pub fn pruned_name(name: &str) -> &str {
    let bytes = name.as_bytes();
    let end = (0..bytes.len())
        .find(|&i| {
            bytes[i] == b'.'
                && bytes.len() >= i + 4
                && bytes[i + 1..i + 4].iter().all(u8::is_ascii_digit)
        })
        .unwrap_or(name.len());
    &name[..end]
}

/// Group items by the true name of their key, in first-seen order.
pub fn group_by_true_name<'a, T>(
    items: impl IntoIterator<Item = T>,
    name_of: impl Fn(&T) -> &'a str,
) -> IndexMap<&'a str, Vec<T>> {
    let mut groups: IndexMap<&str, Vec<T>> = IndexMap::new();
    for item in items {
        groups.entry(true_name(name_of(&item))).or_default().push(item);
    }
    groups
}

/// Hands out sub-indices: the number of earlier objects with the same name.
#[derive(Debug, Default)]
pub struct SubIndexCounter {
    seen: HashMap<String, u64>,
}

impl SubIndexCounter {
    pub fn next(&mut self, name: &str) -> u64 {
        let count = self.seen.entry_ref(name).or_insert(0);
        let index = *count;
        *count += 1;
        index
    }
}
