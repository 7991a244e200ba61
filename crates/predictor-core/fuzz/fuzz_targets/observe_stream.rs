#![no_main]

use predictor_core::{
    AccessStatus, BusAdapter, BusDirection, BusOperation, NullReporter, ObserveOutcome, Predictor,
    RecordingSink, RegisterSpace, RegisterSpec,
};
use libfuzzer_sys::fuzz_target;

struct ByteAdapter;

impl BusAdapter<[u8; 4]> for ByteAdapter {
    fn decode(&self, transfer: &[u8; 4]) -> BusOperation {
        let [addr, data, flags, byte_enable] = *transfer;
        let direction = if flags & 0x01 == 0 {
            BusDirection::Write
        } else {
            BusDirection::Read
        };
        let status = if flags & 0x02 == 0 {
            AccessStatus::Ok
        } else {
            AccessStatus::Error
        };
        BusOperation::new(u64::from(addr), u64::from(data), direction)
            .with_byte_enable(byte_enable)
            .with_status(status)
    }
}

fuzz_target!(|data: &[u8]| {
    let mut space = RegisterSpace::new(1).expect("1-byte bus is supported");
    let block = space.add_block("blk", 0x0);
    space
        .add_register(block, RegisterSpec::new("narrow", vec![0x10], 8))
        .expect("valid declaration");
    space
        .add_register(block, RegisterSpec::new("wide", vec![0x20, 0x21, 0x22, 0x23], 32))
        .expect("valid declaration");
    space
        .add_memory_range("mem", 0x80, 0xFF)
        .expect("disjoint range");
    space.set_check_on_read(true);

    let mut predictor: Predictor<[u8; 4]> = Predictor::new();
    predictor.set_adapter(Box::new(ByteAdapter));

    let mut sink = RecordingSink::new();
    let mut reporter = NullReporter;
    for chunk in data.chunks_exact(4) {
        let beat = [chunk[0], chunk[1], chunk[2], chunk[3]];
        let outcome = predictor.observe(&beat, &mut space, &mut sink, &mut reporter);
        match outcome {
            ObserveOutcome::Completed { register } | ObserveOutcome::Collision { register } => {
                assert!(!predictor.pending().contains(register));
            }
            ObserveOutcome::Accumulated { register, observed, expected } => {
                assert!(observed < expected);
                assert!(predictor.pending().contains(register));
            }
            ObserveOutcome::Ignored | ObserveOutcome::Fault { .. } => {}
        }
        assert!(predictor.pending().len() <= space.register_count());
    }

    let audit = predictor.audit(&space, &mut NullReporter);
    assert_eq!(audit.pending.len(), predictor.pending().len());
});
