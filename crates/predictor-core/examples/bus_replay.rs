//! Replays a canned bus-transfer stream and prints the reconstructed
//! register transactions alongside the diagnostic report stream.

use predictor_core::{
    BusAdapter, BusDirection, BusOperation, CompletionSink, PredictedTransaction, Predictor,
    RecordingReporter, RegisterSpace, RegisterSpec,
};
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

/// Raw transfer shape a bus monitor would hand over: `(addr, data, write?)`.
type MonitorBeat = (u64, u64, bool);

struct MonitorAdapter;

impl BusAdapter<MonitorBeat> for MonitorAdapter {
    fn decode(&self, transfer: &MonitorBeat) -> BusOperation {
        let (addr, data, is_write) = *transfer;
        let direction = if is_write {
            BusDirection::Write
        } else {
            BusDirection::Read
        };
        BusOperation::new(addr, data, direction)
    }
}

struct PrintingSink;

impl CompletionSink for PrintingSink {
    fn publish(&mut self, txn: PredictedTransaction) {
        println!(
            "published {:?} target={:?} value={:#x} status={:?}",
            txn.kind, txn.target, txn.value, txn.status
        );
    }
}

fn main() {
    let mut space = RegisterSpace::new(4).expect("4-byte bus is supported");
    let block = space.add_block("uart", 0x1000);
    space
        .add_register(block, RegisterSpec::new("ctrl", vec![0x1000], 32))
        .expect("valid declaration");
    space
        .add_register(block, RegisterSpec::new("baud", vec![0x1004, 0x1008], 64))
        .expect("valid declaration");
    space
        .add_memory_range("fifo", 0x2000, 0x2FFF)
        .expect("disjoint range");

    let mut predictor: Predictor<MonitorBeat> = Predictor::new();
    predictor.set_adapter(Box::new(MonitorAdapter));

    let stream: [MonitorBeat; 6] = [
        (0x1000, 0x0000_0003, true),
        (0x1004, 0x0001_C200, true),
        (0x2004, 0x0000_00FF, true),
        (0x1008, 0x0000_0001, true),
        (0x1000, 0x0000_0003, false),
        (0x1004, 0x0001_C200, true),
    ];

    let mut sink = PrintingSink;
    let mut reporter = RecordingReporter::new();
    for beat in &stream {
        predictor.observe(beat, &mut space, &mut sink, &mut reporter);
    }

    let audit = predictor.audit(&space, &mut reporter);
    println!("audit pending={:?}", audit.pending);

    for report in &reporter.reports {
        println!(
            "report [{:?}] {}: {}",
            report.severity,
            report.tag.as_str(),
            report.message
        );
    }
}
