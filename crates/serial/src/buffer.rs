//! Serial buffer engine: interrupt-to-task byte plumbing.
//!
//! One engine instance services up to [`MAX_UARTS`](crate::MAX_UARTS) UART
//! pairs. Each cooperative cycle ([`SerialBufferEngine::service`]) does, in
//! order: route every rx event queued before cycle entry, drain tx queues
//! into at most one bounded hardware burst per channel, re-arm reception.
//! Receive work in a cycle strictly precedes that cycle's transmit work.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Receiver, Sender};
use embassy_time::{Duration, Timer};
use platform::UartPort;

use crate::event::RxByteEvent;
use crate::queue::{ByteQueue, OverflowPolicy};
use crate::{InitError, MAX_UARTS, RX_EVENT_DEPTH, RX_QUEUE_DEPTH, TX_INBOX_DEPTH, TX_QUEUE_DEPTH};

/// Cooperative loop period for the buffer task.
pub const LOOP_PERIOD: Duration = Duration::from_millis(1);

/// Startup description of one UART pair.
pub struct UartChannelConfig<'a, M: RawMutex, P: UartPort> {
    /// UART index matched against [`RxByteEvent::uart`].
    pub index: u8,
    /// Hardware handle, owned exclusively by the buffer task from here on.
    pub port: P,
    /// Producer side of this UART's rx queue (consumed by the command task).
    pub rx_route: Sender<'a, M, u8, RX_QUEUE_DEPTH>,
    /// Consumer side of the tx handoff channel (fed by the command task).
    pub tx_inbox: Receiver<'a, M, u8, TX_INBOX_DEPTH>,
    /// Overflow policy for this UART's tx data queue.
    pub tx_policy: OverflowPolicy,
}

/// Running telemetry, readable by the supervising task for logging.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BufferStats {
    /// Rx bytes routed to a UART's rx queue.
    pub routed: u32,
    /// Rx bytes lost because a UART's rx queue was full.
    pub rx_dropped: u32,
    /// Rx events whose UART index matched no configured channel.
    pub unknown_uart: u32,
    /// Hardware transmit bursts issued.
    pub bursts: u32,
    /// Bursts that the port reported as failed.
    pub tx_errors: u32,
}

struct UartChannel<'a, M: RawMutex, P: UartPort, const BURST: usize> {
    index: u8,
    port: P,
    rx_route: Sender<'a, M, u8, RX_QUEUE_DEPTH>,
    tx_inbox: Receiver<'a, M, u8, TX_INBOX_DEPTH>,
    tx_queue: ByteQueue<TX_QUEUE_DEPTH>,
    staging: [u8; BURST],
}

/// The serial buffer task's engine.
///
/// `BURST` is the transmit staging-buffer capacity — the hard upper bound on
/// bytes per hardware burst. Board images pick 16–128 depending on the UART's
/// DMA arrangement.
pub struct SerialBufferEngine<'a, M: RawMutex, P: UartPort, const BURST: usize> {
    rx_events: Receiver<'a, M, RxByteEvent, RX_EVENT_DEPTH>,
    channels: heapless::Vec<UartChannel<'a, M, P, BURST>, MAX_UARTS>,
    stats: BufferStats,
}

impl<'a, M: RawMutex, P: UartPort, const BURST: usize> SerialBufferEngine<'a, M, P, BURST> {
    /// Register the UART channel table and take the rx-event consumer.
    pub fn new(
        rx_events: Receiver<'a, M, RxByteEvent, RX_EVENT_DEPTH>,
        configs: heapless::Vec<UartChannelConfig<'a, M, P>, MAX_UARTS>,
    ) -> Result<Self, InitError> {
        if configs.is_empty() {
            return Err(InitError::NoChannels);
        }
        let mut channels: heapless::Vec<UartChannel<'a, M, P, BURST>, MAX_UARTS> =
            heapless::Vec::new();
        for config in configs {
            if channels.iter().any(|c| c.index == config.index) {
                return Err(InitError::DuplicateUart);
            }
            // Capacity bound: configs and channels share MAX_UARTS.
            channels
                .push(UartChannel {
                    index: config.index,
                    port: config.port,
                    rx_route: config.rx_route,
                    tx_inbox: config.tx_inbox,
                    tx_queue: ByteQueue::new(config.tx_policy),
                    staging: [0; BURST],
                })
                .ok();
        }
        Ok(Self {
            rx_events,
            channels,
            stats: BufferStats::default(),
        })
    }

    /// One cooperative cycle.
    pub async fn service(&mut self) {
        self.route_rx_events();
        self.drain_tx().await;
        for channel in &mut self.channels {
            channel.port.arm_receive();
        }
    }

    /// Telemetry snapshot.
    pub fn stats(&self) -> BufferStats {
        self.stats
    }

    /// The hardware handle for UART `index` (mock inspection in tests).
    pub fn port(&self, index: u8) -> Option<&P> {
        self.channels
            .iter()
            .find(|c| c.index == index)
            .map(|c| &c.port)
    }

    /// Mutable hardware handle for UART `index`.
    pub fn port_mut(&mut self, index: u8) -> Option<&mut P> {
        self.channels
            .iter_mut()
            .find(|c| c.index == index)
            .map(|c| &mut c.port)
    }

    /// Route every event queued at cycle entry. The iteration cap is the
    /// occupancy observed on entry, so a producer keeping pace with the drain
    /// cannot pin this task in the loop and mid-cycle arrivals wait for the
    /// next cycle.
    fn route_rx_events(&mut self) {
        for _ in 0..self.rx_events.len() {
            let Ok(event) = self.rx_events.try_receive() else {
                break;
            };
            match self.channels.iter().find(|c| c.index == event.uart) {
                Some(channel) => {
                    if channel.rx_route.try_send(event.byte).is_ok() {
                        self.stats.routed = self.stats.routed.saturating_add(1);
                    } else {
                        self.stats.rx_dropped = self.stats.rx_dropped.saturating_add(1);
                    }
                }
                None => {
                    self.stats.unknown_uart = self.stats.unknown_uart.saturating_add(1);
                }
            }
        }
    }

    async fn drain_tx(&mut self) {
        for channel in &mut self.channels {
            // Absorb waiting response bytes into the tx data queue; bounded
            // by the inbox capacity per cycle.
            for _ in 0..TX_INBOX_DEPTH {
                let Ok(byte) = channel.tx_inbox.try_receive() else {
                    break;
                };
                channel.tx_queue.push(byte);
            }

            if !channel.port.tx_idle() || channel.tx_queue.is_empty() {
                continue;
            }

            let mut count: usize = 0;
            for slot in channel.staging.iter_mut() {
                let Some(byte) = channel.tx_queue.pop() else {
                    break;
                };
                *slot = byte;
                count = count.saturating_add(1);
            }
            let burst = channel.staging.get(..count).unwrap_or_default();
            self.stats.bursts = self.stats.bursts.saturating_add(1);
            if channel.port.write_burst(burst).await.is_err() {
                self.stats.tx_errors = self.stats.tx_errors.saturating_add(1);
            }
        }
    }
}

/// Buffer task body: service, yield, repeat.
pub async fn run<M: RawMutex, P: UartPort, const BURST: usize>(
    mut engine: SerialBufferEngine<'_, M, P, BURST>,
) -> ! {
    loop {
        engine.service().await;
        Timer::after(LOOP_PERIOD).await;
    }
}
