//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter         | Implements     | Connects to                |
//! |-----------------|----------------|----------------------------|
//! | `clock`         | Clock          | System time / manual time  |
//! | `csv_sink`      | ReadingSink    | Append-only CSV file       |
//! | `log_sink`      | EventSink      | Process log output         |
//! | `notifier`      | Notifier       | Process log output         |
//! | `settings_file` | SettingsStore  | JSON file on disk          |

pub mod clock;
pub mod csv_sink;
pub mod log_sink;
pub mod notifier;
pub mod settings_file;
