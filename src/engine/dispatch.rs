//! Delivery of matched orders to the next participant.

use crate::types::Message;

/// Anything that can receive a message: a market, a facility, or the
/// routing layer in between.
///
/// The market hands every dispatched order to the communicator it was
/// built with.
pub trait Communicator {
    fn receive_message(&mut self, message: Message);
}

/// Collects messages in arrival order. Handy as a sink in tests and
/// single-process simulations.
impl Communicator for Vec<Message> {
    fn receive_message(&mut self, message: Message) {
        self.push(message);
    }
}

impl<C: Communicator + ?Sized> Communicator for &mut C {
    fn receive_message(&mut self, message: Message) {
        (**self).receive_message(message);
    }
}

impl<C: Communicator + ?Sized> Communicator for Box<C> {
    fn receive_message(&mut self, message: Message) {
        (**self).receive_message(message);
    }
}
