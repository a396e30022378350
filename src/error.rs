//! Error taxonomy shared by the record store and the exporter. Every variant
//! except `Initialization` is something the terminal UI reports in the footer
//! and then keeps running.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The database file could not be opened or the schema could not be
    /// created. The binary exits when it sees this.
    #[error("Tidak dapat menginisialisasi basis data {}", path.display())]
    Initialization {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("Film dengan judul '{title}' sudah ada.")]
    DuplicateTitle { title: String },

    #[error("Judul film tidak boleh kosong.")]
    EmptyTitle,

    /// A caller asked to change a record without naming one that was listed.
    #[error("Harap pilih film dari tabel.")]
    InvalidSelection,

    #[error("Kesalahan basis data")]
    Storage(#[from] rusqlite::Error),

    #[error("Tidak dapat mengekspor data ke {}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = Error> = std::result::Result<T, E>;
