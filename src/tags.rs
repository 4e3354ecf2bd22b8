/*!
 * Marker search inside `ClassName` elements
 */

use std::collections::HashSet;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::Result;
use crate::types::TagMatches;

/// Element whose text is searched for markers
pub const CLASS_NAME_ELEMENT: &[u8] = b"ClassName";

/// One open element while walking the document
struct Frame {
    /// Slot in the collected values, for `ClassName` elements
    slot: Option<usize>,
    /// Set once a child element starts; later text is tail text, not element text
    saw_child: bool,
}

/// Collect the trimmed text of every `ClassName` element below the root, in document order
///
/// The text of an element is its character data up to its first child
/// element. Elements with no text are skipped.
pub fn class_names(text: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<Frame> = Vec::new();
    let mut values: Vec<String> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let slot = open_element(&mut stack, &mut values, e.name().as_ref());
                stack.push(Frame {
                    slot,
                    saw_child: false,
                });
            }
            Event::Empty(e) => {
                // No text to record, but it still ends the parent's leading text
                open_element(&mut stack, &mut values, e.name().as_ref());
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Text(e) => {
                if let Some(slot) = text_slot(&stack) {
                    values[slot].push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if let Some(slot) = text_slot(&stack) {
                    values[slot].push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(values
        .into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect())
}

/// Mark the parent as having a child and reserve a slot if `name` is `ClassName`
///
/// The document element has no parent and is never collected.
fn open_element(stack: &mut [Frame], values: &mut Vec<String>, name: &[u8]) -> Option<usize> {
    let parent = stack.last_mut()?;
    parent.saw_child = true;

    if name == CLASS_NAME_ELEMENT {
        values.push(String::new());
        Some(values.len() - 1)
    } else {
        None
    }
}

fn text_slot(stack: &[Frame]) -> Option<usize> {
    stack
        .last()
        .filter(|frame| !frame.saw_child)
        .and_then(|frame| frame.slot)
}

/// Find which markers occur, case-insensitively, in some `ClassName` text
///
/// Markers keep their given order and duplicates are dropped. The
/// representative value of a matched marker is the first matching
/// `ClassName` in document order.
pub fn scan_class_names(text: &str, markers: &[String]) -> Result<TagMatches> {
    let values = class_names(text)?;
    let lowered: Vec<String> = values.iter().map(|v| v.to_lowercase()).collect();

    let mut seen = HashSet::new();
    let mut matches = TagMatches::default();

    for marker in markers {
        if !seen.insert(marker.as_str()) {
            continue;
        }

        let needle = marker.to_lowercase();
        match lowered.iter().position(|value| value.contains(&needle)) {
            Some(index) => matches.found.push((marker.clone(), values[index].clone())),
            None => matches.missing.push(marker.clone()),
        }
    }

    Ok(matches)
}
