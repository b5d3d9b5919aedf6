//! Integration tests for ordered persistent collections

use recflow_foundation::{FieldMap, List, Value};

#[test]
fn list_is_persistent() {
    let mut a: List<i32> = (1..=3).collect();
    let b = a.clone();
    a.push_back(4);
    assert_eq!(a.len(), 4);
    assert_eq!(b.len(), 3);
    assert_eq!(b.last(), Some(&3));
}

#[test]
fn list_update_returns_old() {
    let mut list: List<&str> = ["a", "b"].into_iter().collect();
    assert_eq!(list.update(1, "c"), Some("b"));
    assert_eq!(list.update(5, "z"), None);
    assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec!["a", "c"]);
}

#[test]
fn field_map_keeps_insertion_order() {
    let mut map = FieldMap::new();
    map.insert("z", 1);
    map.insert("a", 2);
    map.insert("m", 3);
    map.insert("a", 4);
    assert_eq!(map.keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
    assert_eq!(map.get("a"), Some(&4));
}

#[test]
fn field_map_remove() {
    let mut map: FieldMap<i32> = [("a", 1), ("b", 2)].into_iter().collect();
    assert_eq!(map.remove("a"), Some(1));
    assert!(!map.contains_key("a"));
    assert_eq!(map.len(), 1);
    assert_eq!(map.remove("a"), None);
}

#[test]
fn add_field_extends_existing_array() {
    let mut map = FieldMap::new();
    map.add_field("k", Value::from("1"));
    map.add_field("k", Value::from("2"));
    map.add_field("k", Value::from("3"));
    assert_eq!(map.get("k"), Some(&Value::from(vec!["1", "2", "3"])));
}
