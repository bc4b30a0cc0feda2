//! Hardware configuration info record.
//!
//! Each assembly under test carries an identity block — part number, revision,
//! serial number, build batch — that the `$HCI` / `#SHCI` / `#RHCI` commands
//! read, write, and reset. The defaults come from the board profile and the
//! live copy is owned by the serial command task.

use thiserror_no_std::Error;

/// Maximum length of one config field, sized for dashed part numbers
/// such as `KT-956-0225-00`.
pub const FIELD_LEN: usize = 24;

/// Number of settable fields (`#SHCI <param_index> <value>` index space).
pub const HWCONFIG_FIELDS: u8 = 4;

/// One identity field.
pub type Field = heapless::String<FIELD_LEN>;

/// Error from a `#SHCI` write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HwConfigError {
    /// `param_index` is not one of the four fields.
    #[error("no such parameter index")]
    BadIndex,
    /// The value does not fit in a field.
    #[error("value too long")]
    TooLong,
}

/// Factory defaults for a board variant's identity block.
#[derive(Debug, Clone, Copy)]
pub struct HwConfigDefaults {
    /// Part number, e.g. `KT-956-0225-00`.
    pub part_no: &'static str,
    /// Hardware revision letter or number.
    pub rev_no: &'static str,
    /// Assembly serial number.
    pub serial_no: &'static str,
    /// Production build batch.
    pub build_batch_no: &'static str,
}

/// Live, mutable identity block.
pub struct HardwareConfigInfo {
    defaults: &'static HwConfigDefaults,
    fields: [Field; HWCONFIG_FIELDS as usize],
}

impl HardwareConfigInfo {
    /// Start from the board's factory defaults.
    #[must_use]
    pub fn new(defaults: &'static HwConfigDefaults) -> Self {
        let mut info = Self {
            defaults,
            fields: [Field::new(), Field::new(), Field::new(), Field::new()],
        };
        info.reset();
        info
    }

    /// Restore all fields to factory defaults (`#RHCI`).
    pub fn reset(&mut self) {
        let d = self.defaults;
        for (field, default) in self
            .fields
            .iter_mut()
            .zip([d.part_no, d.rev_no, d.serial_no, d.build_batch_no])
        {
            field.clear();
            // Defaults are compile-time constants; a board profile with a
            // default longer than FIELD_LEN is a programming error and the
            // field is truncated to what fits.
            for ch in default.chars() {
                if field.push(ch).is_err() {
                    break;
                }
            }
        }
    }

    /// Overwrite one field by `#SHCI` parameter index.
    pub fn set_field(&mut self, index: u8, value: &str) -> Result<(), HwConfigError> {
        let field = self
            .fields
            .get_mut(usize::from(index))
            .ok_or(HwConfigError::BadIndex)?;
        let mut replacement = Field::new();
        replacement
            .push_str(value)
            .map_err(|_| HwConfigError::TooLong)?;
        *field = replacement;
        Ok(())
    }

    /// Field accessors in `!HCI` response order.
    #[must_use]
    #[allow(clippy::indexing_slicing)] // fixed-size array, constant in-range indices
    pub fn fields(&self) -> [&str; HWCONFIG_FIELDS as usize] {
        [
            self.fields[0].as_str(),
            self.fields[1].as_str(),
            self.fields[2].as_str(),
            self.fields[3].as_str(),
        ]
    }
}
