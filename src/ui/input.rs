//! Once-per-tick keyboard sampling.

use super::renderer::{Key, Renderer};
use crate::error::Result;

/// What the dispatcher sees for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    None,
    Key(Key),
}

impl Input {
    pub fn key(self) -> Option<Key> {
        match self {
            Input::None => None,
            Input::Key(key) => Some(key),
        }
    }
}

/// Keep only the last of a burst of keys.
pub fn coalesce<I: IntoIterator<Item = Key>>(keys: I) -> Input {
    keys.into_iter().last().map_or(Input::None, Input::Key)
}

/// Drain every key the renderer has pending without waiting and keep the
/// most recent one. Keys typed during a long tick are not replayed on the
/// following ticks.
pub fn poll_input<R: Renderer + ?Sized>(renderer: &mut R) -> Result<Input> {
    let mut failure = None;
    let input = coalesce(std::iter::from_fn(|| match renderer.get_key_non_blocking() {
        Ok(key) => key,
        Err(e) => {
            failure = Some(e);
            None
        }
    }));
    match failure {
        Some(e) => Err(e),
        None => Ok(input),
    }
}
