use std::collections::HashSet;
use std::net::TcpListener;
use std::sync::{Mutex, OnceLock};

/// Hands out free localhost ports without giving the same port to two tests
/// running in parallel.
pub struct TestPortAllocator {
    leased: Mutex<HashSet<u16>>,
}

impl TestPortAllocator {
    pub fn instance() -> &'static TestPortAllocator {
        static INSTANCE: OnceLock<TestPortAllocator> = OnceLock::new();
        INSTANCE.get_or_init(|| TestPortAllocator {
            leased: Mutex::new(HashSet::new()),
        })
    }

    pub fn lease_port(&'static self) -> Result<PortLease, Box<dyn std::error::Error>> {
        for _ in 0..100 {
            // Let the OS pick a free port, then release it for the server
            let port = TcpListener::bind("127.0.0.1:0")?.local_addr()?.port();
            let mut leased = self.leased.lock().map_err(|e| e.to_string())?;
            if leased.insert(port) {
                return Ok(PortLease {
                    port,
                    allocator: self,
                });
            }
        }
        Err("could not find a free port".into())
    }
}

pub struct PortLease {
    port: u16,
    allocator: &'static TestPortAllocator,
}

impl PortLease {
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Drop for PortLease {
    fn drop(&mut self) {
        if let Ok(mut leased) = self.allocator.leased.lock() {
            leased.remove(&self.port);
        }
    }
}
