mod nota;

pub use nota::{CreditStatus, Nota, NotaView};
