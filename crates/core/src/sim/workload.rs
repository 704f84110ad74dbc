//! Synthetic workload generators.
//!
//! Each workload emulates a small array-processing program at `-O0`: array
//! elements, loop accumulators, and search results all live in memory, so
//! every source-level access becomes a load or store event. Program counters
//! are stable per static instruction, and addresses are laid out in distinct
//! text, data, and stack regions.
//!
//! The programs are:
//! 1. **stride:** Fill `arr[i] = i * 4`, then sum the array.
//! 2. **context:** Fill `arr` with a repeating four-value pattern, then walk
//!    it alternating `arr[i]` (even `i`) and `arr[i - 1]` (odd `i`).
//! 3. **store-to-load:** Copy `arr` into `copy`, then sum `copy`.
//! 4. **store-array:** Prefix sums: `arr[i] = arr[i - 1] + i` over 64-bit cells.
//! 5. **linear-search:** Repeatedly search a five-element vector for `3`.
//! 6. **hybrid:** The stride, context, and store-to-load phases back to back.

use std::fmt;
use std::str::FromStr;

use super::memory::{SparseMemory, truncate};
use super::trace::TraceEvent;
use crate::common::error::SimError;

/// Base of the synthetic text segment.
const TEXT_BASE: u64 = 0x0040_1000;

/// Base of the first data array.
const DATA_BASE: u64 = 0x1000_0000;

/// Address of the loop accumulator on the stack.
const STACK_SUM: u64 = 0x7FFF_F000;

/// Address of the search result on the stack.
const STACK_LOC: u64 = 0x7FFF_F008;

/// Width of a C `int`.
const INT: usize = 4;

/// Width of a `uint64_t`.
const WORD: usize = 8;

/// Values cycled through by the context workload.
const CONTEXT_PATTERN: [u64; 4] = [10, 20, 30, 40];

/// Values searched by the linear-search workload.
const SEARCH_VALUES: [u64; 5] = [1, 2, 3, 4, 5];

/// Value the linear-search workload looks for.
const SEARCH_TARGET: u64 = 3;

/// Available synthetic workloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Workload {
    /// Constant-stride array fill and sum.
    Stride,
    /// Alternating accesses over a repeating pattern.
    Context,
    /// Array copy followed by reading the copy back.
    StoreToLoad,
    /// Prefix sums over 64-bit cells.
    StoreArray,
    /// Repeated linear search of a short vector.
    LinearSearch,
    /// Stride, context, and store-to-load phases combined.
    Hybrid,
}

impl Workload {
    /// Every workload, in listing order.
    pub const ALL: [Self; 6] = [
        Self::Stride,
        Self::Context,
        Self::StoreToLoad,
        Self::StoreArray,
        Self::LinearSearch,
        Self::Hybrid,
    ];

    /// Name accepted by [`Workload::from_str`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Stride => "stride",
            Self::Context => "context",
            Self::StoreToLoad => "store-to-load",
            Self::StoreArray => "store-array",
            Self::LinearSearch => "linear-search",
            Self::Hybrid => "hybrid",
        }
    }

    /// Generates the event stream for a problem size of `len`.
    ///
    /// `len` is the array length (or the number of searches for
    /// `linear-search`).
    pub fn generate(self, len: usize) -> Vec<TraceEvent> {
        let mut prog = Program::default();
        let arr = DATA_BASE;
        let copy = DATA_BASE + region_size(len, INT);

        match self {
            Self::Stride => {
                prog.fill(arr, len, |i| i * 4);
                prog.sum(0, arr, len);
            }
            Self::Context => {
                prog.fill(arr, len, |i| CONTEXT_PATTERN[(i % 4) as usize]);
                prog.alternate(arr, len);
            }
            Self::StoreToLoad => {
                prog.fill(arr, len, |i| i * 4);
                prog.copy(arr, copy, len);
                prog.sum(1, copy, len);
            }
            Self::StoreArray => prog.prefix_sums(arr, len),
            Self::LinearSearch => prog.linear_search(arr, len),
            Self::Hybrid => {
                prog.fill(arr, len, |i| i * 4);
                prog.sum(0, arr, len);
                prog.alternate(arr, len);
                prog.copy(arr, copy, len);
                prog.sum(1, copy, len);
            }
        }

        prog.events
    }
}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Workload {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|w| w.name() == wanted)
            .ok_or_else(|| SimError::UnknownWorkload(s.to_string()))
    }
}

/// Bytes reserved for `len` elements of `width`, rounded up to a 4 KiB page.
const fn region_size(len: usize, width: usize) -> u64 {
    ((len as u64 * width as u64) + 0xFFF) & !0xFFF
}

/// Program counter of static instruction `n`.
const fn pc(n: u64) -> u64 {
    TEXT_BASE + 4 * n
}

/// Emulated program: shadow memory plus the events emitted so far.
#[derive(Debug, Default)]
struct Program {
    memory: SparseMemory,
    events: Vec<TraceEvent>,
}

impl Program {
    fn store(&mut self, pc: u64, addr: u64, size: usize, value: u64) {
        let value = truncate(value, size);
        self.memory.write(addr, size, value);
        self.events.push(TraceEvent::Store {
            pc,
            addr,
            size,
            value: Some(value),
        });
    }

    fn load(&mut self, pc: u64, addr: u64, size: usize) -> u64 {
        let value = self.memory.read(addr, size);
        self.events.push(TraceEvent::Load {
            pc,
            addr,
            size,
            value,
        });
        value.unwrap_or(0)
    }

    /// `for i in 0..len { arr[i] = f(i) }`
    fn fill(&mut self, arr: u64, len: usize, f: impl Fn(u64) -> u64) {
        for i in 0..len as u64 {
            self.store(pc(0), arr + i * INT as u64, INT, f(i));
        }
    }

    /// `sum = 0; for i in 0..len { sum += arr[i] }`
    ///
    /// `site` separates the program counters of distinct summation loops.
    fn sum(&mut self, site: u64, arr: u64, len: usize) {
        let base = 10 + site * 4;
        self.store(pc(base), STACK_SUM, INT, 0);
        for i in 0..len as u64 {
            let acc = self.load(pc(base + 1), STACK_SUM, INT);
            let elem = self.load(pc(base + 2), arr + i * INT as u64, INT);
            self.store(pc(base + 3), STACK_SUM, INT, acc.wrapping_add(elem));
        }
    }

    /// `if i % 2 == 0 { sum += arr[i] } else { sum -= arr[i - 1] }`
    fn alternate(&mut self, arr: u64, len: usize) {
        self.store(pc(20), STACK_SUM, INT, 0);
        for i in 0..len as u64 {
            let acc = self.load(pc(21), STACK_SUM, INT);
            let next = if i % 2 == 0 {
                let elem = self.load(pc(22), arr + i * INT as u64, INT);
                acc.wrapping_add(elem)
            } else {
                let elem = self.load(pc(23), arr + (i - 1) * INT as u64, INT);
                acc.wrapping_sub(elem)
            };
            self.store(pc(24), STACK_SUM, INT, next);
        }
    }

    /// `for i in 0..len { dst[i] = src[i] }`
    fn copy(&mut self, src: u64, dst: u64, len: usize) {
        for i in 0..len as u64 {
            let offset = i * INT as u64;
            let elem = self.load(pc(30), src + offset, INT);
            self.store(pc(31), dst + offset, INT, elem);
        }
    }

    /// `arr[0] = 0; for i in 1..len { arr[i] = arr[i - 1] + i }`
    fn prefix_sums(&mut self, arr: u64, len: usize) {
        if len == 0 {
            return;
        }
        self.store(pc(40), arr, WORD, 0);
        for i in 1..len as u64 {
            let prev = self.load(pc(41), arr + (i - 1) * WORD as u64, WORD);
            self.store(pc(42), arr + i * WORD as u64, WORD, prev.wrapping_add(i));
        }
    }

    /// Fills a five-element vector and searches it for the target `searches` times.
    fn linear_search(&mut self, v: u64, searches: usize) {
        for (i, &value) in (0u64..).zip(SEARCH_VALUES.iter()) {
            self.store(pc(50), v + i * INT as u64, INT, value);
        }
        for _ in 0..searches {
            for i in 0..SEARCH_VALUES.len() as u64 {
                if self.load(pc(51), v + i * INT as u64, INT) == SEARCH_TARGET {
                    self.store(pc(52), STACK_LOC, INT, i);
                    break;
                }
            }
        }
    }
}
