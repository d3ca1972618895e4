//! Where native functions write their text.
//!
//! The engine stores its `Output` in every context slot it creates, so
//! callbacks can reach it with `context.get_slot::<Output>()`.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

/// In-memory sink shared between an engine and its owner.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, decoded lossily as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    fn append(&self, bytes: &[u8]) {
        self.0.borrow_mut().extend_from_slice(bytes);
    }
}

#[derive(Debug, Clone, Default)]
pub enum Output {
    #[default]
    Stdout,
    Buffer(SharedBuffer),
}

impl Output {
    /// Write `text` followed by a single `\n`.
    pub fn write_line(&self, text: &str) {
        match self {
            Output::Stdout => {
                let mut stdout = std::io::stdout().lock();

                if let Err(e) = writeln!(stdout, "{}", text).and_then(|_| stdout.flush()) {
                    tracing::warn!("Failed to write to stdout: {}", e);
                }
            }
            Output::Buffer(buffer) => {
                buffer.append(text.as_bytes());
                buffer.append(b"\n");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_collects_lines() {
        let buffer = SharedBuffer::new();
        let output = Output::Buffer(buffer.clone());

        assert!(buffer.is_empty());
        output.write_line("hello");
        output.write_line("");
        output.write_line("héllo");

        assert_eq!(buffer.contents(), "hello\n\nhéllo\n");

        buffer.clear();
        assert!(buffer.is_empty());
    }
}
