use std::time::Duration;

use super::{Frame, MarbleError, MarbleValues, SubscriptionLog, TestMessage};
use crate::notification::Notification;

const ONE_MS: Duration = Duration::from_millis(1);

/// Parses a marble diagram into timed notifications, one frame per
/// millisecond.
///
/// Frames count from the subscription point `^` when there is one, so
/// messages before it get negative frames. `#` turns into `error`, which has
/// to be given when the diagram contains one.
///
/// ```rust
/// use rxmarble::{marble::*, notification::Notification};
///
/// let messages = parse_marbles("-a-(b|)", &[('a', 1), ('b', 2)], None::<()>).unwrap();
/// assert_eq!(messages, vec![
///   TestMessage::new(1, Notification::Next(1)),
///   TestMessage::new(3, Notification::Next(2)),
///   TestMessage::new(3, Notification::Complete),
/// ]);
/// ```
pub fn parse_marbles<Item, Err, V>(
  marbles: &str, values: &V, error: Option<Err>,
) -> Result<Vec<TestMessage<Item, Err>>, MarbleError>
where
  V: MarbleValues<Item> + ?Sized,
  Err: Clone,
{
  parse_marbles_in(marbles, values, error, ONE_MS)
}

/// Parses a subscription diagram made of `^`, `!`, `-`, groups and time
/// progressions. A diagram without `^` subscribes at frame zero.
pub fn parse_marbles_as_subscriptions(marbles: &str) -> Result<SubscriptionLog, MarbleError> {
  let (subscribed, unsubscribed) = subscription_frames(marbles, ONE_MS)?;
  Ok(SubscriptionLog::new(subscribed.unwrap_or(0), unsubscribed))
}

pub(crate) fn parse_marbles_in<Item, Err, V>(
  marbles: &str, values: &V, error: Option<Err>, frame_duration: Duration,
) -> Result<Vec<TestMessage<Item, Err>>, MarbleError>
where
  V: MarbleValues<Item> + ?Sized,
  Err: Clone,
{
  let chars: Vec<char> = marbles.trim().chars().collect();
  let offset = subscription_offset(&chars, frame_duration);
  let mut messages = vec![];
  let mut frame: Frame = 0;
  let mut group_start: Option<Frame> = None;
  let mut i = 0;
  while i < chars.len() {
    let at = group_start.unwrap_or(frame) - offset;
    match chars[i] {
      ' ' => {}
      '-' | '^' => frame += 1,
      '(' => {
        group_start = Some(frame);
        frame += 1;
      }
      ')' => {
        group_start = None;
        frame += 1;
      }
      '|' => {
        messages.push(TestMessage::new(at, Notification::Complete));
        frame += 1;
      }
      '#' => {
        let err = error.clone().ok_or(MarbleError::MissingErrorValue { index: i })?;
        messages.push(TestMessage::new(at, Notification::Error(err)));
        frame += 1;
      }
      '!' => return Err(MarbleError::UnexpectedUnsubscription),
      c => {
        if let Some((len, frames)) = time_progression(&chars, i, frame_duration) {
          frame += frames;
          i += len;
          continue;
        }
        let value = values.value_of(c).ok_or(MarbleError::UnknownValue { key: c, index: i })?;
        messages.push(TestMessage::new(at, Notification::Next(value)));
        frame += 1;
      }
    }
    i += 1;
  }
  Ok(messages)
}

/// Frame of the `^` marker, zero when there is none.
fn subscription_offset(chars: &[char], frame_duration: Duration) -> Frame {
  let mut frame = 0;
  let mut group_start = None;
  let mut i = 0;
  while i < chars.len() {
    match chars[i] {
      ' ' | '!' => {}
      '^' => return group_start.unwrap_or(frame),
      '(' => {
        group_start = Some(frame);
        frame += 1;
      }
      ')' => {
        group_start = None;
        frame += 1;
      }
      _ => {
        if let Some((len, frames)) = time_progression(chars, i, frame_duration) {
          frame += frames;
          i += len;
          continue;
        }
        frame += 1;
      }
    }
    i += 1;
  }
  0
}

pub(crate) fn subscription_frames(
  marbles: &str, frame_duration: Duration,
) -> Result<(Option<Frame>, Option<Frame>), MarbleError> {
  let chars: Vec<char> = marbles.trim().chars().collect();
  let mut subscribed = None;
  let mut unsubscribed = None;
  let mut frame: Frame = 0;
  let mut group_start: Option<Frame> = None;
  let mut i = 0;
  while i < chars.len() {
    match chars[i] {
      ' ' => {}
      '-' => frame += 1,
      '(' => {
        group_start = Some(frame);
        frame += 1;
      }
      ')' => {
        group_start = None;
        frame += 1;
      }
      '^' => {
        if subscribed.is_some() {
          return Err(MarbleError::DuplicateSubscription);
        }
        subscribed = Some(group_start.unwrap_or(frame));
        frame += 1;
      }
      '!' => {
        if unsubscribed.is_some() {
          return Err(MarbleError::DuplicateUnsubscription);
        }
        unsubscribed = Some(group_start.unwrap_or(frame));
      }
      c => match time_progression(&chars, i, frame_duration) {
        Some((len, frames)) => {
          frame += frames;
          i += len;
          continue;
        }
        None => return Err(MarbleError::UnexpectedSubscriptionMarble(c)),
      },
    }
    i += 1;
  }
  Ok((subscribed, unsubscribed))
}

/// Recognizes `<number>(ms|s|m) ` at `i`, which must be the start of the
/// diagram or follow a space. Returns the characters consumed, trailing space
/// included, and the frames it spans.
fn time_progression(chars: &[char], i: usize, frame_duration: Duration) -> Option<(usize, Frame)> {
  if !chars[i].is_ascii_digit() || (i > 0 && chars[i - 1] != ' ') {
    return None;
  }
  let rest = &chars[i..];
  let number_len = rest.iter().take_while(|c| c.is_ascii_digit() || **c == '.').count();
  let number: String = rest[..number_len].iter().collect();
  let amount: f64 = number.parse().ok()?;
  let after = &rest[number_len..];
  let (unit_len, unit_ms) = match after {
    ['m', 's', ' ', ..] => (2, 1.),
    ['s', ' ', ..] => (1, 1_000.),
    ['m', ' ', ..] => (1, 60_000.),
    _ => return None,
  };
  let frame_nanos = frame_duration.as_nanos() as f64;
  let frames = if frame_nanos > 0. { (amount * unit_ms * 1_000_000. / frame_nanos) as Frame } else { 0 };
  Some((number_len + unit_len + 1, frames))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::marble::CharValues;

  type Messages = Vec<TestMessage<char, &'static str>>;

  fn parse(marbles: &str) -> Messages { parse_marbles(marbles, &CharValues, Some("error")).unwrap() }

  fn next(frame: Frame, c: char) -> TestMessage<char, &'static str> {
    TestMessage::new(frame, Notification::Next(c))
  }

  fn complete(frame: Frame) -> TestMessage<char, &'static str> { TestMessage::new(frame, Notification::Complete) }

  #[test]
  fn values_and_completion() {
    assert_eq!(parse("-a-b-|"), vec![next(1, 'a'), next(3, 'b'), complete(5)]);
  }

  #[test]
  fn groups_share_their_start_frame() {
    assert_eq!(parse("(abc|)"), vec![next(0, 'a'), next(0, 'b'), next(0, 'c'), complete(0)]);
    assert_eq!(parse("--a-(b|)"), vec![next(2, 'a'), next(4, 'b'), complete(4)]);
    // every character of a group still takes a frame
    assert_eq!(parse("(ab)c"), vec![next(0, 'a'), next(0, 'b'), next(4, 'c')]);
  }

  #[test]
  fn error_marker() {
    assert_eq!(parse("--#"), vec![TestMessage::new(2, Notification::Error("error"))]);
    assert_eq!(
      parse_marbles::<char, (), _>("-#", &CharValues, None),
      Err(MarbleError::MissingErrorValue { index: 1 })
    );
  }

  #[test]
  fn subscription_point_shifts_frames() {
    assert_eq!(parse("a-^-b-|"), vec![next(-2, 'a'), next(2, 'b'), complete(4)]);
    assert_eq!(parse("(a^)b"), vec![next(0, 'a'), next(4, 'b')]);
  }

  #[test]
  fn spaces_are_ignored() {
    assert_eq!(parse("  -a  b "), vec![next(1, 'a'), next(2, 'b')]);
  }

  #[test]
  fn time_progression_in_milliseconds_seconds_and_minutes() {
    assert_eq!(parse("a 10ms b"), vec![next(0, 'a'), next(11, 'b')]);
    assert_eq!(parse("1s a"), vec![next(1_000, 'a')]);
    assert_eq!(parse("a 1m |"), vec![next(0, 'a'), complete(60_001)]);
    assert_eq!(parse("a 1.5ms b"), vec![next(0, 'a'), next(2, 'b')]);
  }

  #[test]
  fn digits_without_unit_are_values() {
    assert_eq!(parse("-1-2"), vec![next(1, '1'), next(3, '2')]);
    // a digit glued to a previous marble is never a time progression
    assert_eq!(parse("a1ms "), vec![next(0, 'a'), next(1, '1'), next(2, 'm'), next(3, 's')]);
  }

  #[test]
  fn time_progression_scales_with_frame_duration() {
    let messages: Messages =
      parse_marbles_in("10ms a", &CharValues, None, Duration::from_millis(5)).unwrap();
    assert_eq!(messages, vec![next(2, 'a')]);
  }

  #[test]
  fn rejects_bad_diagrams() {
    assert_eq!(
      parse_marbles::<i32, (), _>("-a-", &[('b', 1)], None),
      Err(MarbleError::UnknownValue { key: 'a', index: 1 })
    );
    assert_eq!(
      parse_marbles::<char, (), _>("-a-!", &CharValues, None),
      Err(MarbleError::UnexpectedUnsubscription)
    );
  }

  #[test]
  fn subscription_diagrams() {
    assert_eq!(parse_marbles_as_subscriptions("^------!"), Ok(SubscriptionLog::new(0, Some(7))));
    assert_eq!(parse_marbles_as_subscriptions("--^---!"), Ok(SubscriptionLog::new(2, Some(6))));
    assert_eq!(parse_marbles_as_subscriptions("--^--"), Ok(SubscriptionLog::new(2, None)));
    assert_eq!(parse_marbles_as_subscriptions("(^!)"), Ok(SubscriptionLog::new(0, Some(0))));
    assert_eq!(parse_marbles_as_subscriptions("^ 10ms !"), Ok(SubscriptionLog::new(0, Some(11))));
    assert_eq!(parse_marbles_as_subscriptions("---!"), Ok(SubscriptionLog::new(0, Some(3))));
  }

  #[test]
  fn subscription_diagram_errors() {
    assert_eq!(parse_marbles_as_subscriptions("^-^"), Err(MarbleError::DuplicateSubscription));
    assert_eq!(parse_marbles_as_subscriptions("^-!-!"), Err(MarbleError::DuplicateUnsubscription));
    assert_eq!(parse_marbles_as_subscriptions("^-a-!"), Err(MarbleError::UnexpectedSubscriptionMarble('a')));
  }
}
