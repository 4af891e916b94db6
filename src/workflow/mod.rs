//! Cross-screen flows: appointment lifecycle, order cancellation and
//! payment initiation.

pub mod appointment;
pub mod order;
pub mod payment;

pub use appointment::{AppointmentWorkflow, BookingRequest, JoinOutcome, MeetingTarget};
pub use order::{can_cancel_order, OrderWorkflow};
pub use payment::{PaymentForm, PaymentRedirect, PaymentReturn, PaymentWorkflow};
