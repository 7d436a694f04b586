//! Message Lookup over a forward-only browser.
//!
//! Browsers only offer sequential access, so finding a message by id is a
//! linear scan. Order is whatever the broker's snapshot order is; two listings
//! of a live queue need not agree.

use crate::broker::{Browser, Message};
use crate::browser::models::MessageSummary;
use crate::error::{BrowserError, Result};

/// Lazy, single-pass listing. Stops after the first error.
pub struct Summaries<'a> {
    browser: &'a mut dyn Browser,
    done: bool,
}

impl Iterator for Summaries<'_> {
    type Item = Result<MessageSummary>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.browser.next_message() {
            Ok(Some(message)) => Some(Ok(summarize(&message))),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(source) => {
                self.done = true;
                Some(Err(BrowserError::Browse {
                    queue: self.browser.queue().name().to_string(),
                    source,
                }))
            }
        }
    }
}

impl std::iter::FusedIterator for Summaries<'_> {}

pub fn list_all(browser: &mut dyn Browser) -> Summaries<'_> {
    Summaries { browser, done: false }
}

/// First message whose id equals `target` exactly.
pub fn find_by_id(browser: &mut dyn Browser, target: &str) -> Result<Message> {
    loop {
        let next = browser.next_message().map_err(|source| BrowserError::Browse {
            queue: browser.queue().name().to_string(),
            source,
        })?;
        match next {
            Some(message) if message.id == target => return Ok(message),
            Some(_) => continue,
            None => {
                return Err(BrowserError::NotFound {
                    queue: browser.queue().name().to_string(),
                    message_id: target.to_string(),
                })
            }
        }
    }
}

fn summarize(message: &Message) -> MessageSummary {
    MessageSummary {
        id: message.id.clone(),
        timestamp: message.timestamp,
        queue: message.destination.name().to_string(),
    }
}
