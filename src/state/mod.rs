// Band and transverter state accumulated across status reads
pub mod accumulator;
pub mod memslot;

pub use accumulator::{
    BandSlot, BandState, StateAccumulator, StateError, StateSnapshot, StateTable, XvtrSlot,
};
pub use memslot::{decode_memslot, MemSlot};
