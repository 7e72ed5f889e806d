use std::collections::HashMap;

/// Maps marble characters to the values they stand for, and back.
///
/// The reverse direction is only used to draw recorded values, so a map
/// that cannot name a value still works for assertions.
pub trait MarbleValues<Item> {
  fn value_of(&self, key: char) -> Option<Item>;

  fn key_of(&self, value: &Item) -> Option<char>;
}

impl<Item, V: MarbleValues<Item> + ?Sized> MarbleValues<Item> for &V {
  #[inline]
  fn value_of(&self, key: char) -> Option<Item> { (**self).value_of(key) }

  #[inline]
  fn key_of(&self, value: &Item) -> Option<char> { (**self).key_of(value) }
}

/// No values at all, for diagrams made only of `-`, `|` and `#`.
impl<Item> MarbleValues<Item> for () {
  fn value_of(&self, _: char) -> Option<Item> { None }

  fn key_of(&self, _: &Item) -> Option<char> { None }
}

impl<Item: Clone + PartialEq> MarbleValues<Item> for HashMap<char, Item> {
  fn value_of(&self, key: char) -> Option<Item> { self.get(&key).cloned() }

  fn key_of(&self, value: &Item) -> Option<char> {
    let mut keys: Vec<char> = self.iter().filter(|(_, v)| *v == value).map(|(k, _)| *k).collect();
    keys.sort_unstable();
    keys.first().copied()
  }
}

impl<Item: Clone + PartialEq> MarbleValues<Item> for [(char, Item)] {
  fn value_of(&self, key: char) -> Option<Item> { self.iter().find(|(k, _)| *k == key).map(|(_, v)| v.clone()) }

  fn key_of(&self, value: &Item) -> Option<char> { self.iter().find(|(_, v)| v == value).map(|(k, _)| *k) }
}

impl<Item: Clone + PartialEq, const N: usize> MarbleValues<Item> for [(char, Item); N] {
  #[inline]
  fn value_of(&self, key: char) -> Option<Item> { self.as_slice().value_of(key) }

  #[inline]
  fn key_of(&self, value: &Item) -> Option<char> { self.as_slice().key_of(value) }
}

impl<Item: Clone + PartialEq> MarbleValues<Item> for Vec<(char, Item)> {
  #[inline]
  fn value_of(&self, key: char) -> Option<Item> { self.as_slice().value_of(key) }

  #[inline]
  fn key_of(&self, value: &Item) -> Option<char> { self.as_slice().key_of(value) }
}

/// Every marble character stands for itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharValues;

impl MarbleValues<char> for CharValues {
  fn value_of(&self, key: char) -> Option<char> { Some(key) }

  fn key_of(&self, value: &char) -> Option<char> { Some(*value) }
}

/// Every marble character stands for the one-character string it spells.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringValues;

impl MarbleValues<String> for StringValues {
  fn value_of(&self, key: char) -> Option<String> { Some(key.to_string()) }

  fn key_of(&self, value: &String) -> Option<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
      (Some(c), None) => Some(c),
      _ => None,
    }
  }
}
