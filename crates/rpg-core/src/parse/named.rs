use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A collection of named declarations.
///
/// The RAML parser serializes `types` and `securitySchemes` as a list of
/// single-entry mappings; hand-written documents usually use a plain mapping.
/// Both shapes are accepted and iterate in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NamedMap<T> {
    Map(IndexMap<String, T>),
    List(Vec<IndexMap<String, T>>),
}

impl<T> Default for NamedMap<T> {
    fn default() -> Self {
        NamedMap::Map(IndexMap::new())
    }
}

impl<T> NamedMap<T> {
    pub fn iter(&self) -> Box<dyn Iterator<Item = (&String, &T)> + '_> {
        match self {
            NamedMap::Map(map) => Box::new(map.iter()),
            NamedMap::List(list) => Box::new(list.iter().flat_map(|entry| entry.iter())),
        }
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.iter().find(|(key, _)| key.as_str() == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_and_list_shapes_agree() {
        let map: NamedMap<u32> = serde_yaml_ng::from_str("a: 1\nb: 2\n").unwrap();
        let list: NamedMap<u32> = serde_yaml_ng::from_str("- a: 1\n- b: 2\n").unwrap();
        let from_map: Vec<_> = map.iter().map(|(k, v)| (k.clone(), *v)).collect();
        let from_list: Vec<_> = list.iter().map(|(k, v)| (k.clone(), *v)).collect();
        assert_eq!(from_map, from_list);
        assert_eq!(list.get("b"), Some(&2));
        assert_eq!(list.len(), 2);
    }
}
