//! Mount option vocabulary and translation.
//!
//! - `MountOptionSet` - ordered `-o` tokens as given on the command line
//! - `KnownOptionTable` - token → mount flag bits
//! - `MountSwitches` - dedicated command switches (`-r`, `-bind`, `-make-*`)
//! - `OptionTranslator` - turns all of the above into a `MountRequest`

mod set;
mod switches;
mod table;
mod translate;

pub use set::MountOptionSet;
pub use switches::MountSwitches;
pub use table::{KnownOptionTable, LOOP_TOKEN};
pub use translate::{MountRequest, OptionTranslator};
