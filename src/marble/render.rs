use super::{Frame, MarbleValues, TestMessage};
use crate::notification::Notification;

/// Draws recorded messages as a marble diagram.
///
/// Messages sharing a frame become a group, values the map cannot name are
/// drawn as `?`. Trailing idle frames are not drawn, so a diagram that ends
/// with a marker renders back to itself.
///
/// ```rust
/// use rxmarble::marble::*;
///
/// let values = [('a', 1), ('b', 2)];
/// let messages = parse_marbles("--a-(b|)", &values, None::<()>).unwrap();
/// assert_eq!(render_marbles(&messages, &values), "--a-(b|)");
/// ```
pub fn render_marbles<Item, Err, V>(messages: &[TestMessage<Item, Err>], values: &V) -> String
where
  V: MarbleValues<Item> + ?Sized,
{
  let mut out = String::new();
  let mut cursor: Frame = 0;
  let mut rest = messages;
  while let Some(first) = rest.first() {
    let frame = first.frame;
    let len = rest.iter().take_while(|m| m.frame == frame).count();
    let (group, tail) = rest.split_at(len);
    rest = tail;

    for _ in cursor..frame {
      out.push('-');
    }
    let start = cursor.max(frame);
    if let [single] = group {
      out.push(symbol(&single.notification, values));
      cursor = start + 1;
    } else {
      out.push('(');
      out.extend(group.iter().map(|m| symbol(&m.notification, values)));
      out.push(')');
      cursor = start + group.len() as Frame + 2;
    }
  }
  out
}

fn symbol<Item, Err, V>(notification: &Notification<Item, Err>, values: &V) -> char
where
  V: MarbleValues<Item> + ?Sized,
{
  match notification {
    Notification::Next(v) => values.key_of(v).unwrap_or('?'),
    Notification::Error(_) => '#',
    Notification::Complete => '|',
  }
}
