use std::sync::{Arc, Mutex};

use reggate::{MapperRef, RegisterGateway, SparseMemory};

/// Gateway over a fresh in-process word space, with a second handle to the
/// backing memory for staging and inspection.
pub fn fixture() -> (Arc<Mutex<SparseMemory>>, RegisterGateway) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mem = Arc::new(Mutex::new(SparseMemory::new("test-mem")));
    let mapper: MapperRef = mem.clone();
    (mem, RegisterGateway::new(mapper))
}
