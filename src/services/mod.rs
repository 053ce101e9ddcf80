// SPDX-License-Identifier: MIT

//! Services module - external capabilities.

pub mod email;

pub use email::Mailer;
