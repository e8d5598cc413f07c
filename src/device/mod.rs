// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Curtain controller.
//!
//! Translates channel commands into bus transactions, polls the motor and
//! tracks whether it is reachable.

use core::fmt;
use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;

use crate::{
    bus::Bus,
    codec::encode_request,
    error::Error,
    frame::*,
    scheduler::{Scheduler, TaskHandle},
    util::*,
};

pub(crate) mod config;

pub use self::config::CurtainConfig;

/// Delay between activation and the first poll.
pub const FIRST_POLL_DELAY: Duration = Duration::from_secs(1);

/// Number of registers read starting at [`DataAddress::Position`].
const STATUS_BLOCK_LEN: Quantity = 4;

/// Number of registers read starting at [`DataAddress::ExtSwitch`].
const SWITCH_BLOCK_LEN: Quantity = 2;

/// Why a curtain is not reachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfflineReason {
    /// The bus has no open connection.
    BridgeOffline,
    /// The transaction failed on the line.
    CommunicationError(String),
    /// A reply arrived but failed the start marker or CRC check, or lacked
    /// requested data.
    InvalidResponse,
}

impl fmt::Display for OfflineReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::BridgeOffline => write!(f, "Bridge offline"),
            Self::CommunicationError(msg) => write!(f, "Communication error: {msg}"),
            Self::InvalidResponse => write!(f, "Invalid response received"),
        }
    }
}

/// Connectivity of a curtain.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    /// No transaction has finished yet.
    #[default]
    Unknown,
    Online,
    Offline(OfflineReason),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "UNKNOWN"),
            Self::Online => write!(f, "ONLINE"),
            Self::Offline(reason) => write!(f, "OFFLINE ({reason})"),
        }
    }
}

/// The controllable and observable properties of a curtain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Position,
    Reverse,
    HandStart,
    /// Read only.
    Mode,
    ExtSwitch,
    HvSwitch,
}

/// A command sent to a [`Channel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Up,
    Down,
    Stop,
    Percent(u8),
    OnOff(bool),
    /// A switch type given as decimal number.
    Text(String),
}

/// The value of a [`Channel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Percent(u8),
    OnOff(bool),
    /// A raw mode or switch type identifier.
    Code(u8),
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Percent(p) => write!(f, "{p}%"),
            Self::OnOff(true) => write!(f, "ON"),
            Self::OnOff(false) => write!(f, "OFF"),
            Self::Code(c) => write!(f, "{c}"),
        }
    }
}

/// Receives everything a curtain reports.
pub trait CurtainListener: Send + Sync {
    /// The connectivity changed.
    fn status_changed(&self, status: &Status);

    /// A channel value was read from the motor.
    fn state_updated(&self, channel: Channel, state: State);
}

/// Build the request for a command.
///
/// Returns `None` if the command has no meaning for the channel.
#[must_use]
pub fn request_for(channel: Channel, command: &Command) -> Option<Request> {
    use Channel as Ch;
    use Command as C;

    let request = match (channel, command) {
        (Ch::Position, C::Up) => Request::Control(ControlAddress::Open, None),
        (Ch::Position, C::Down) => Request::Control(ControlAddress::Close, None),
        (Ch::Position, C::Stop) => Request::Control(ControlAddress::Stop, None),
        (Ch::Position, C::Percent(p)) => Request::Control(ControlAddress::Percent, Some(*p)),
        (Ch::Reverse, C::OnOff(on)) => {
            Request::Write(DataAddress::DefaultDir, bool_to_byte(*on))
        }
        (Ch::HandStart, C::OnOff(on)) => {
            Request::Write(DataAddress::HandStart, hand_start_to_byte(*on))
        }
        (Ch::ExtSwitch, C::Text(text)) => {
            Request::Write(DataAddress::ExtSwitch, parse_code(text)?)
        }
        (Ch::HvSwitch, C::Text(text)) => {
            Request::Write(DataAddress::ExtHvSwitch, parse_code(text)?)
        }
        _ => return None,
    };
    Some(request)
}

/// Parse a signed byte, so `-1` selects `0xFF`.
fn parse_code(text: &str) -> Option<u8> {
    text.trim()
        .parse::<i8>()
        .inspect_err(|err| log::warn!("Invalid switch type '{text}': {err}"))
        .ok()
        .map(|code| code as u8)
}

/// Check a reply before any field of it is used.
fn check_reply(request: Request, reply: &Packet) -> Result<(), Error> {
    reply.validate()?;
    if let Request::Read(_, count) = request {
        if reply.data().len() < usize::from(count) {
            return Err(Error::BufferSize(reply.as_bytes().len()));
        }
    }
    Ok(())
}

/// A curtain motor on a [`Bus`].
///
/// Polling starts on [`Curtain::activate`] and stops on
/// [`Curtain::deactivate`] or when the curtain is dropped.
pub struct Curtain {
    inner: Arc<Inner>,
    poll: Option<TaskHandle>,
}

struct Inner {
    config: CurtainConfig,
    bus: Arc<Bus>,
    scheduler: Arc<dyn Scheduler>,
    listener: Arc<dyn CurtainListener>,
    status: Mutex<Status>,
    // Held for a whole transaction including the status update.
    transaction: Mutex<()>,
}

impl Curtain {
    /// Start talking to the curtain configured in `config`.
    pub fn activate(
        config: CurtainConfig,
        bus: Arc<Bus>,
        scheduler: Arc<dyn Scheduler>,
        listener: Arc<dyn CurtainListener>,
    ) -> Self {
        log::debug!(
            "Activating curtain {:#06X}, polling every {:?}",
            config.address,
            config.poll_interval
        );
        let poll_interval = config.poll_interval;
        let inner = Arc::new(Inner {
            config,
            bus,
            scheduler,
            listener,
            status: Mutex::new(Status::Unknown),
            transaction: Mutex::new(()),
        });
        inner.listener.status_changed(&Status::Unknown);

        let poller = Arc::clone(&inner);
        let poll = inner.scheduler.schedule_with_fixed_delay(
            FIRST_POLL_DELAY,
            poll_interval,
            Arc::new(move || poller.poll()),
        );
        Self {
            inner,
            poll: Some(poll),
        }
    }

    /// Stop polling.
    ///
    /// A transaction that is already running still finishes.
    pub fn deactivate(mut self) {
        log::debug!("Deactivating curtain {:#06X}", self.inner.config.address);
        self.stop_poll();
    }

    fn stop_poll(&mut self) {
        if let Some(poll) = self.poll.take() {
            poll.cancel();
        }
    }

    #[must_use]
    pub fn config(&self) -> &CurtainConfig {
        &self.inner.config
    }

    /// The last known connectivity.
    #[must_use]
    pub fn status(&self) -> Status {
        self.inner.status.lock().clone()
    }

    /// Submit `command` without waiting for the transaction.
    ///
    /// Returns `false` if the command was ignored.
    pub fn handle_command(&self, channel: Channel, command: &Command) -> bool {
        let Some(request) = request_for(channel, command) else {
            log::debug!("Ignoring {command:?} on {channel:?}");
            return false;
        };
        let inner = Arc::clone(&self.inner);
        let _handle = self.inner.scheduler.schedule(
            Duration::ZERO,
            Box::new(move || {
                if let Some(reply) = inner.transact(request) {
                    log::trace!(
                        "Function {} addr {} reply {reply:X}",
                        request.function(),
                        request.address()
                    );
                }
            }),
        );
        true
    }

    /// Run one poll cycle on the calling thread.
    pub fn poll_now(&self) {
        self.inner.poll();
    }
}

impl Drop for Curtain {
    fn drop(&mut self) {
        self.stop_poll();
    }
}

impl Inner {
    /// Run a transaction and update the status with its outcome.
    ///
    /// Returns the reply if it passed the validity check and carries all
    /// requested data bytes.
    fn transact(&self, request: Request) -> Option<Packet> {
        let _transaction = self.transaction.lock();
        let packet = encode_request(self.config.address, request);
        let outcome = match self.bus.execute(&packet) {
            Ok(Some(reply)) => match check_reply(request, &reply) {
                Ok(()) => Ok(reply),
                Err(err) => {
                    log::warn!("Invalid reply received: {reply:X} ({err})");
                    if let Err(err) = self.bus.flush() {
                        log::warn!("Failed to flush bus: {err}");
                    }
                    Err(OfflineReason::InvalidResponse)
                }
            },
            Ok(None) => Err(OfflineReason::BridgeOffline),
            Err(err) => {
                log::warn!(
                    "Transaction with curtain {:#06X} failed: {err}",
                    self.config.address
                );
                Err(OfflineReason::CommunicationError(err.to_string()))
            }
        };
        match outcome {
            Ok(reply) => {
                self.update_status(Status::Online);
                Some(reply)
            }
            Err(reason) => {
                self.update_status(Status::Offline(reason));
                None
            }
        }
    }

    fn update_status(&self, status: Status) {
        {
            let mut current = self.status.lock();
            if *current == status {
                return;
            }
            current.clone_from(&status);
        }
        log::debug!("Curtain {:#06X} is {status}", self.config.address);
        self.listener.status_changed(&status);
    }

    fn update_state(&self, channel: Channel, state: State) {
        self.listener.state_updated(channel, state);
    }

    fn poll(&self) {
        let status = Request::Read(DataAddress::Position, STATUS_BLOCK_LEN);
        if let Some(reply) = self.transact(status) {
            if let [position, reverse, hand_start, mode, ..] = *reply.data() {
                let position = normalize_position(position);
                let hand_start = byte_to_hand_start(hand_start);
                self.update_state(Channel::Position, State::Percent(position));
                self.update_state(Channel::Reverse, State::OnOff(byte_to_bool(reverse)));
                self.update_state(Channel::HandStart, State::OnOff(hand_start));
                self.update_state(Channel::Mode, State::Code(mode));
            }
        }

        if !self.config.poll_switches {
            return;
        }
        let switches = Request::Read(DataAddress::ExtSwitch, SWITCH_BLOCK_LEN);
        if let Some(reply) = self.transact(switches) {
            if let [ext_switch, hv_switch, ..] = *reply.data() {
                self.update_state(Channel::ExtSwitch, State::Code(ext_switch));
                self.update_state(Channel::HvSwitch, State::Code(hv_switch));
            }
        }
    }
}
