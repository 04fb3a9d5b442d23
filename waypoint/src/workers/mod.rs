//! Built-in worker variants.
//!
//! | Worker | Behaviour |
//! |--------|-----------|
//! | [`Hop`] | Steps past itself, records itself on the return route, forwards |
//! | [`Echoer`] | Sends the message back along its return route |
//! | [`Printer`] | Logs the message and absorbs it |
//! | [`Inbox`] | Consumes its hop and hands the message to a channel |

mod echoer;
mod hop;
mod inbox;
mod printer;

pub use echoer::Echoer;
pub use hop::Hop;
pub use inbox::Inbox;
pub use printer::Printer;

use crate::{Node, RegistrationError};

/// Register the reference topology used by demos: hops `h1`, `h2`, `h3`,
/// an `echoer` and a logging `printer`.
pub fn start_reference_workers(node: &Node) -> Result<(), RegistrationError> {
    for hop in ["h1", "h2", "h3"] {
        node.start_worker(hop, Hop)?;
    }
    node.start_worker("echoer", Echoer)?;
    node.start_worker("printer", Printer::new())?;
    Ok(())
}
