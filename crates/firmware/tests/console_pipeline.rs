//! Whole-pipeline test: rx events in, hardware transmit bursts out.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;
use platform::mocks::{
    MockAdc, MockFan, MockLed, MockPps, MockSignalBank, MockSynth, MockUartPort,
};
use serial::buffer::UartChannelConfig;
use serial::{
    OverflowPolicy, PeripheralSet, RxByteEvent, SerialBufferEngine, SerialCommandEngine,
    RX_EVENT_DEPTH, RX_QUEUE_DEPTH, TX_INBOX_DEPTH,
};

use firmware::boards::interface;

const BURST: usize = 32;

type EventChannel = Channel<NoopRawMutex, RxByteEvent, RX_EVENT_DEPTH>;
type RxChannel = Channel<NoopRawMutex, u8, RX_QUEUE_DEPTH>;
type TxChannel = Channel<NoopRawMutex, u8, TX_INBOX_DEPTH>;

#[tokio::test]
async fn hci_query_crosses_the_whole_console_path() {
    let events = EventChannel::new();
    let rx = RxChannel::new();
    let tx = TxChannel::new();

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
    let mut buffer: SerialBufferEngine<'_, NoopRawMutex, MockUartPort, BURST> =
        SerialBufferEngine::new(events.receiver(), configs).expect("one channel");

    let board = PeripheralSet {
        adc: MockAdc::new(&[3300, 1250]),
        led: MockLed::default(),
        synth: MockSynth::new(35, 4400),
        fan: MockFan::default(),
        signals: MockSignalBank::new(&interface::SIGNALS),
        pps: MockPps::default(),
        buzzer_signal: interface::BUZZER_SIGNAL,
        ext_reset_signal: interface::EXT_RESET_SIGNAL,
        buttons: &interface::BUTTONS,
    };
    let mut command =
        SerialCommandEngine::new(&interface::PROFILE, board, rx.receiver(), tx.sender())
            .expect("valid profile");

    // Bytes arrive "from the ISR".
    for &byte in b"$HCI\r" {
        events.sender().try_send(RxByteEvent { uart: 0, byte }).unwrap();
    }

    // Buffer cycle routes them, command task consumes and responds, next
    // buffer cycles drain the response into hardware bursts.
    buffer.service().await;
    while let Ok(byte) = rx.receiver().try_receive() {
        command.feed(byte).await;
    }
    buffer.service().await;
    buffer.service().await;

    let transmitted = buffer.port(0).expect("uart 0").transmitted();
    assert_eq!(transmitted, b"!HCI KT-956-0225-00 B 0000 1\r\n");
    assert_eq!(command.stats().dispatched, 1);
    assert_eq!(buffer.stats().rx_dropped, 0);
}
