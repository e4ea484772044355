use shmregion::ShmRegion;

/// Byte storage behind the simulated hardware. Implementations must make every `set` visible to
/// the next `get` immediately, without buffering.
pub trait Region {
    fn len(&self) -> usize;

    /// Returns [None] if `index` lies outside the region
    fn get(&self, index: usize) -> Option<u8>;

    /// Returns false and changes nothing if `index` lies outside the region
    fn set(&mut self, index: usize, value: u8) -> bool;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn fill(&mut self, value: u8) {
        for i in 0..self.len() {
            self.set(i, value);
        }
    }

    fn to_vec(&self) -> Vec<u8> {
        (0..self.len()).filter_map(|i| self.get(i)).collect()
    }

    /// Pushes the content to wherever it is persisted
    fn flush(&self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Region for ShmRegion {
    fn len(&self) -> usize {
        ShmRegion::len(self)
    }

    fn get(&self, index: usize) -> Option<u8> {
        ShmRegion::get(self, index)
    }

    fn set(&mut self, index: usize, value: u8) -> bool {
        ShmRegion::set(self, index, value)
    }

    fn fill(&mut self, value: u8) {
        ShmRegion::fill(self, value)
    }

    fn to_vec(&self) -> Vec<u8> {
        ShmRegion::to_vec(self)
    }

    fn flush(&self) -> std::io::Result<()> {
        ShmRegion::flush(self)
    }
}

/// Process-private region, used when nothing outside the process needs to observe the state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRegion(Vec<u8>);

impl MemoryRegion {
    pub fn new(len: usize) -> Self {
        MemoryRegion(vec![0; len])
    }
}

impl From<Vec<u8>> for MemoryRegion {
    fn from(bytes: Vec<u8>) -> Self {
        MemoryRegion(bytes)
    }
}

impl Region for MemoryRegion {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn get(&self, index: usize) -> Option<u8> {
        self.0.get(index).copied()
    }

    fn set(&mut self, index: usize, value: u8) -> bool {
        match self.0.get_mut(index) {
            Some(b) => {
                *b = value;
                true
            }
            None => false,
        }
    }

    fn to_vec(&self) -> Vec<u8> {
        self.0.clone()
    }
}
