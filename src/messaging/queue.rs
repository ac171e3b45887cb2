//! Command queue
//!
//! Collects commands from any thread. The engine thread drains it at the
//! start of each tick, so every mutation happens inside `tick`.

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::commands::Command;

/// Multi-producer queue of pending commands
pub struct CommandQueue {
    command_tx: Sender<Command>,
    command_rx: Receiver<Command>,
}

impl CommandQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        let (tx, rx) = unbounded();

        Self {
            command_tx: tx,
            command_rx: rx,
        }
    }

    /// Get a sender for submitting commands from another thread
    pub fn sender(&self) -> Sender<Command> {
        self.command_tx.clone()
    }

    /// Queue a command for the next tick
    pub fn submit(&self, command: Command) {
        tracing::debug!("Queued command: {}", command.description());
        // The queue holds its own receiver, so the channel cannot be closed
        let _ = self.command_tx.send(command);
    }

    /// Take every command queued so far, in submission order
    pub fn drain(&self) -> Vec<Command> {
        self.command_rx.try_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.command_rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.command_rx.is_empty()
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_queue_preserves_order() {
        let queue = CommandQueue::new();
        queue.submit(Command::StopSounds);
        queue.submit(Command::StopMusic);
        assert_eq!(queue.len(), 2);

        let drained = queue.drain();
        assert_eq!(drained, vec![Command::StopSounds, Command::StopMusic]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_sender_from_other_thread() {
        let queue = CommandQueue::new();
        let sender = queue.sender();

        thread::spawn(move || {
            sender.send(Command::StartThunder).unwrap();
        })
        .join()
        .unwrap();

        assert_eq!(queue.drain(), vec![Command::StartThunder]);
    }
}
