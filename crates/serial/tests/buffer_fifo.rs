//! Buffer-engine tests: rx routing fidelity and bounded transmit bursts.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(clippy::arithmetic_side_effects)]

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;
use platform::mocks::MockUartPort;
use serial::buffer::UartChannelConfig;
use serial::{
    InitError, OverflowPolicy, RxByteEvent, SerialBufferEngine, RX_EVENT_DEPTH, RX_QUEUE_DEPTH,
    TX_INBOX_DEPTH,
};

const BURST: usize = 8;

type EventChannel = Channel<NoopRawMutex, RxByteEvent, RX_EVENT_DEPTH>;
type RxChannel = Channel<NoopRawMutex, u8, RX_QUEUE_DEPTH>;
type TxChannel = Channel<NoopRawMutex, u8, TX_INBOX_DEPTH>;

fn single_uart<'a>(
    events: &'a EventChannel,
    rx: &'a RxChannel,
    tx: &'a TxChannel,
) -> SerialBufferEngine<'a, NoopRawMutex, MockUartPort, BURST> {
    let mut configs = heapless::Vec::new();
    configs
        .push(UartChannelConfig {
            index: 0,
            port: MockUartPort::new(),
            rx_route: rx.sender(),
            tx_inbox: tx.receiver(),
            tx_policy: OverflowPolicy::DropNewest,
        })
        .ok()
        .unwrap();
    SerialBufferEngine::new(events.receiver(), configs).expect("one channel")
}

#[tokio::test]
async fn rx_bytes_arrive_in_fifo_order() {
    let events = EventChannel::new();
    let rx = RxChannel::new();
    let tx = TxChannel::new();
    let mut engine = single_uart(&events, &rx, &tx);

    for &byte in b"$HCI\r" {
        events.sender().try_send(RxByteEvent { uart: 0, byte }).unwrap();
    }
    engine.service().await;

    let mut routed = Vec::new();
    while let Ok(byte) = rx.receiver().try_receive() {
        routed.push(byte);
    }
    assert_eq!(routed, b"$HCI\r");
    assert_eq!(engine.stats().routed, 5);
    assert_eq!(engine.stats().rx_dropped, 0);
}

#[tokio::test]
async fn rx_routed_by_uart_index() {
    let events = EventChannel::new();
    let rx0 = RxChannel::new();
    let tx0 = TxChannel::new();
    let rx1 = RxChannel::new();
    let tx1 = TxChannel::new();

    let mut configs = heapless::Vec::new();
    for (index, rx, tx) in [(0u8, &rx0, &tx0), (1u8, &rx1, &tx1)] {
        configs
            .push(UartChannelConfig {
                index,
                port: MockUartPort::new(),
                rx_route: rx.sender(),
                tx_inbox: tx.receiver(),
                tx_policy: OverflowPolicy::DropNewest,
            })
            .ok()
            .unwrap();
    }
    let mut engine: SerialBufferEngine<'_, NoopRawMutex, MockUartPort, BURST> =
        SerialBufferEngine::new(events.receiver(), configs).expect("two channels");

    events.sender().try_send(RxByteEvent { uart: 0, byte: b'a' }).unwrap();
    events.sender().try_send(RxByteEvent { uart: 1, byte: b'b' }).unwrap();
    events.sender().try_send(RxByteEvent { uart: 0, byte: b'c' }).unwrap();
    engine.service().await;

    assert_eq!(rx0.receiver().try_receive(), Ok(b'a'));
    assert_eq!(rx0.receiver().try_receive(), Ok(b'c'));
    assert!(rx0.receiver().try_receive().is_err());
    assert_eq!(rx1.receiver().try_receive(), Ok(b'b'));
}

#[tokio::test]
async fn unknown_uart_counted_not_routed() {
    let events = EventChannel::new();
    let rx = RxChannel::new();
    let tx = TxChannel::new();
    let mut engine = single_uart(&events, &rx, &tx);

    events.sender().try_send(RxByteEvent { uart: 7, byte: b'x' }).unwrap();
    engine.service().await;

    assert!(rx.receiver().try_receive().is_err());
    assert_eq!(engine.stats().unknown_uart, 1);
    assert_eq!(engine.stats().routed, 0);
}

#[tokio::test]
async fn full_event_channel_drains_in_one_cycle() {
    let events = EventChannel::new();
    let rx = RxChannel::new();
    let tx = TxChannel::new();
    let mut engine = single_uart(&events, &rx, &tx);

    // The drain bound is the occupancy at cycle entry, so a channel filled to
    // capacity empties in a single service call.
    for i in 0..RX_EVENT_DEPTH {
        events
            .sender()
            .try_send(RxByteEvent { uart: 0, byte: i as u8 })
            .unwrap();
    }
    engine.service().await;

    assert!(events.receiver().try_receive().is_err());
    assert_eq!(engine.stats().routed, RX_EVENT_DEPTH as u32);
    for i in 0..RX_EVENT_DEPTH {
        assert_eq!(rx.receiver().try_receive(), Ok(i as u8));
    }
}

#[tokio::test]
async fn full_rx_queue_drops_and_counts() {
    let events = EventChannel::new();
    let rx = RxChannel::new();
    let tx = TxChannel::new();
    let mut engine = single_uart(&events, &rx, &tx);

    // Saturate the rx queue out of band, then route one more byte.
    while rx.sender().try_send(0).is_ok() {}
    events.sender().try_send(RxByteEvent { uart: 0, byte: b'z' }).unwrap();
    engine.service().await;

    assert_eq!(engine.stats().rx_dropped, 1);
    assert_eq!(engine.stats().routed, 0);
}

async fn drive_tx(input: &[u8], cycles: usize) -> (Vec<Vec<u8>>, u32) {
    let events = EventChannel::new();
    let rx = RxChannel::new();
    let tx = TxChannel::new();
    let mut engine = single_uart(&events, &rx, &tx);

    for &byte in input {
        tx.sender().try_send(byte).unwrap();
    }
    for _ in 0..cycles {
        engine.service().await;
    }
    let bursts = engine.port(0).expect("uart 0").bursts.clone();
    (bursts, engine.stats().bursts)
}

#[tokio::test]
async fn burst_never_exceeds_staging_capacity() {
    // One byte under, exactly at, and one over the staging capacity.
    for (len, expected) in [
        (BURST - 1, vec![BURST - 1]),
        (BURST, vec![BURST]),
        (BURST + 1, vec![BURST, 1]),
    ] {
        let payload = vec![b'Q'; len];
        let (bursts, issued) = drive_tx(&payload, 2).await;
        let sizes: Vec<usize> = bursts.iter().map(Vec::len).collect();
        assert_eq!(sizes, expected, "payload len {len}");
        assert_eq!(issued as usize, expected.len());
        let flat: Vec<u8> = bursts.into_iter().flatten().collect();
        assert_eq!(flat, payload);
    }
}

#[tokio::test]
async fn tx_preserves_byte_order_across_bursts() {
    let payload: Vec<u8> = (0..40).collect();
    let (bursts, _) = drive_tx(&payload, 8).await;
    for burst in &bursts {
        assert!(burst.len() <= BURST);
    }
    let flat: Vec<u8> = bursts.into_iter().flatten().collect();
    assert_eq!(flat, payload);
}

#[tokio::test]
async fn busy_port_defers_burst_until_idle() {
    let events = EventChannel::new();
    let rx = RxChannel::new();
    let tx = TxChannel::new();
    let mut engine = single_uart(&events, &rx, &tx);

    tx.sender().try_send(b'!').unwrap();
    engine.port_mut(0).expect("uart 0").idle = false;
    engine.service().await;
    assert!(engine.port(0).expect("uart 0").bursts.is_empty());

    engine.port_mut(0).expect("uart 0").idle = true;
    engine.service().await;
    assert_eq!(engine.port(0).expect("uart 0").transmitted(), b"!");
}

#[tokio::test]
async fn every_cycle_rearms_reception() {
    let events = EventChannel::new();
    let rx = RxChannel::new();
    let tx = TxChannel::new();
    let mut engine = single_uart(&events, &rx, &tx);

    engine.service().await;
    engine.service().await;
    assert_eq!(engine.port(0).expect("uart 0").arms, 2);
}

#[tokio::test]
async fn empty_channel_table_rejected() {
    let events = EventChannel::new();
    let configs: heapless::Vec<UartChannelConfig<'_, NoopRawMutex, MockUartPort>, 2> =
        heapless::Vec::new();
    let result: Result<SerialBufferEngine<'_, NoopRawMutex, MockUartPort, BURST>, _> =
        SerialBufferEngine::new(events.receiver(), configs);
    assert!(matches!(result, Err(InitError::NoChannels)));
}

#[tokio::test]
async fn duplicate_uart_index_rejected() {
    let events = EventChannel::new();
    let rx = RxChannel::new();
    let tx = TxChannel::new();

    let mut configs = heapless::Vec::new();
    for _ in 0..2 {
        configs
            .push(UartChannelConfig {
                index: 3,
                port: MockUartPort::new(),
                rx_route: rx.sender(),
                tx_inbox: tx.receiver(),
                tx_policy: OverflowPolicy::DropNewest,
            })
            .ok()
            .unwrap();
    }
    let result: Result<SerialBufferEngine<'_, NoopRawMutex, MockUartPort, BURST>, _> =
        SerialBufferEngine::new(events.receiver(), configs);
    assert!(matches!(result, Err(InitError::DuplicateUart)));
}
