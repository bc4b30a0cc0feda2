//! Command grammar: descriptor tables and argument parsing.
//!
//! One table-driven parser serves every board variant. A board's
//! [`CommandSet`] lists the [`CommandDescriptor`]s it accepts; [`parse`]
//! matches the keyword token, checks arity, and hands the argument tokens to
//! the descriptor's builder. Anything that fails — unknown keyword, wrong
//! argument count, malformed number — collapses to a [`ParseError`], which
//! the command task reports as the single `?` error token.

use thiserror_no_std::Error;

use crate::hwconfig;

/// Maximum tokens per frame: keyword plus two arguments, plus one spare so
/// over-long lines fail arity rather than truncating silently.
const MAX_TOKENS: usize = 4;

/// A fully decoded, validated command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `$HCI` — query the hardware config info block.
    GetHwConfig,
    /// `#RHCI` — reset the hardware config info block to defaults.
    ResetHwConfig,
    /// `#SHCI <param_index> <value>` — overwrite one config field.
    SetHwConfig {
        /// Field index, `0..HWCONFIG_FIELDS`.
        index: u8,
        /// Replacement value.
        value: heapless::String<{ hwconfig::FIELD_LEN }>,
    },
    /// `$BTN` — read the button signal bitmask.
    ReadButtons,
    /// `#BZR <0|1>` — drive the buzzer output.
    SetBuzzer(bool),
    /// `#XRST <0|1>` — drive the external reset signal.
    SetExtReset(bool),
    /// `#LDC <index>` — select the lit LED.
    SetLedIndex(u8),
    /// `#LDM <mode>` — select the LED display mode.
    SetLedMode(u8),
    /// `$ADC` — read every voltage channel.
    ReadAdc,
    /// `$TMP` — read the temperature channel.
    ReadTemperature,
    /// `#SYN <mhz>` — program the synthesizer frequency.
    SetSynthMhz(u32),
    /// `$FAN` — read the fan speed.
    ReadFanSpeed,
    /// `#FAN <celsius>` — push a temperature to the fan controller.
    PushFanTemperature(i16),
}

/// Why a frame failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Keyword matched no descriptor in the board's command set.
    #[error("unknown command keyword")]
    UnknownCommand,
    /// Wrong number of argument tokens for the matched keyword.
    #[error("wrong argument count")]
    BadArity,
    /// An argument token failed numeric/flag/length validation.
    #[error("malformed argument")]
    BadArgument,
}

/// Builder from validated-arity argument tokens to a [`Command`].
pub type Builder = fn(&[&[u8]]) -> Result<Command, ParseError>;

/// Static binding of a keyword to its argument shape and builder.
pub struct CommandDescriptor {
    /// Fixed ASCII keyword including its `$`/`#` prefix.
    pub keyword: &'static str,
    /// Exact number of argument tokens.
    pub arity: usize,
    /// Argument validator/constructor.
    pub build: Builder,
}

/// A board variant's accepted command subset.
pub type CommandSet = &'static [CommandDescriptor];

/// Decode one frame against `set`.
pub fn parse(set: CommandSet, line: &[u8]) -> Result<Command, ParseError> {
    let mut tokens: heapless::Vec<&[u8], MAX_TOKENS> = heapless::Vec::new();
    for token in line.split(u8::is_ascii_whitespace).filter(|t| !t.is_empty()) {
        // More tokens than any command accepts: report arity, not unknown,
        // so the operator sees the same `?` either way but tests can tell.
        tokens.push(token).map_err(|_| ParseError::BadArity)?;
    }
    let keyword = tokens.first().ok_or(ParseError::UnknownCommand)?;
    let descriptor = set
        .iter()
        .find(|d| d.keyword.as_bytes() == *keyword)
        .ok_or(ParseError::UnknownCommand)?;
    let args = tokens.get(1..).unwrap_or(&[]);
    if args.len() != descriptor.arity {
        return Err(ParseError::BadArity);
    }
    (descriptor.build)(args)
}

// ── Argument token helpers ───────────────────────────────────────────────────

fn arg<'a>(args: &[&'a [u8]], index: usize) -> Result<&'a [u8], ParseError> {
    args.get(index).copied().ok_or(ParseError::BadArity)
}

fn parse_u32(token: &[u8]) -> Result<u32, ParseError> {
    if token.is_empty() {
        return Err(ParseError::BadArgument);
    }
    let mut value: u32 = 0;
    for &b in token {
        let digit = match b {
            b'0'..=b'9' => u32::from(b - b'0'),
            _ => return Err(ParseError::BadArgument),
        };
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(digit))
            .ok_or(ParseError::BadArgument)?;
    }
    Ok(value)
}

fn parse_u8(token: &[u8]) -> Result<u8, ParseError> {
    u8::try_from(parse_u32(token)?).map_err(|_| ParseError::BadArgument)
}

fn parse_i16(token: &[u8]) -> Result<i16, ParseError> {
    let (negative, digits) = match token.split_first() {
        Some((b'-', rest)) => (true, rest),
        _ => (false, token),
    };
    let magnitude = parse_u32(digits)?;
    let magnitude = i32::try_from(magnitude).map_err(|_| ParseError::BadArgument)?;
    let signed = if negative {
        magnitude.checked_neg().ok_or(ParseError::BadArgument)?
    } else {
        magnitude
    };
    i16::try_from(signed).map_err(|_| ParseError::BadArgument)
}

/// `0` or `1`, nothing else — not "true", not "on".
fn parse_flag(token: &[u8]) -> Result<bool, ParseError> {
    match token {
        b"0" => Ok(false),
        b"1" => Ok(true),
        _ => Err(ParseError::BadArgument),
    }
}

fn parse_field(token: &[u8]) -> Result<heapless::String<{ hwconfig::FIELD_LEN }>, ParseError> {
    let text = core::str::from_utf8(token).map_err(|_| ParseError::BadArgument)?;
    let mut field = heapless::String::new();
    field.push_str(text).map_err(|_| ParseError::BadArgument)?;
    Ok(field)
}

// ── Builders ─────────────────────────────────────────────────────────────────

fn build_get_hwconfig(_: &[&[u8]]) -> Result<Command, ParseError> {
    Ok(Command::GetHwConfig)
}

fn build_reset_hwconfig(_: &[&[u8]]) -> Result<Command, ParseError> {
    Ok(Command::ResetHwConfig)
}

fn build_set_hwconfig(args: &[&[u8]]) -> Result<Command, ParseError> {
    let index = parse_u8(arg(args, 0)?)?;
    if index >= hwconfig::HWCONFIG_FIELDS {
        return Err(ParseError::BadArgument);
    }
    let value = parse_field(arg(args, 1)?)?;
    Ok(Command::SetHwConfig { index, value })
}

fn build_read_buttons(_: &[&[u8]]) -> Result<Command, ParseError> {
    Ok(Command::ReadButtons)
}

fn build_set_buzzer(args: &[&[u8]]) -> Result<Command, ParseError> {
    Ok(Command::SetBuzzer(parse_flag(arg(args, 0)?)?))
}

fn build_set_ext_reset(args: &[&[u8]]) -> Result<Command, ParseError> {
    Ok(Command::SetExtReset(parse_flag(arg(args, 0)?)?))
}

fn build_set_led_index(args: &[&[u8]]) -> Result<Command, ParseError> {
    Ok(Command::SetLedIndex(parse_u8(arg(args, 0)?)?))
}

fn build_set_led_mode(args: &[&[u8]]) -> Result<Command, ParseError> {
    Ok(Command::SetLedMode(parse_u8(arg(args, 0)?)?))
}

fn build_read_adc(_: &[&[u8]]) -> Result<Command, ParseError> {
    Ok(Command::ReadAdc)
}

fn build_read_temperature(_: &[&[u8]]) -> Result<Command, ParseError> {
    Ok(Command::ReadTemperature)
}

fn build_set_synth(args: &[&[u8]]) -> Result<Command, ParseError> {
    Ok(Command::SetSynthMhz(parse_u32(arg(args, 0)?)?))
}

fn build_read_fan(_: &[&[u8]]) -> Result<Command, ParseError> {
    Ok(Command::ReadFanSpeed)
}

fn build_push_fan_temperature(args: &[&[u8]]) -> Result<Command, ParseError> {
    Ok(Command::PushFanTemperature(parse_i16(arg(args, 0)?)?))
}

// ── Canonical descriptor table ───────────────────────────────────────────────

/// Every command any board variant understands. Board profiles reference
/// entries from here (or define their own subset tables) — there is exactly
/// one parser and one grammar.
pub const ALL_COMMANDS: &[CommandDescriptor] = &[
    CommandDescriptor {
        keyword: "$HCI",
        arity: 0,
        build: build_get_hwconfig,
    },
    CommandDescriptor {
        keyword: "#RHCI",
        arity: 0,
        build: build_reset_hwconfig,
    },
    CommandDescriptor {
        keyword: "#SHCI",
        arity: 2,
        build: build_set_hwconfig,
    },
    CommandDescriptor {
        keyword: "$BTN",
        arity: 0,
        build: build_read_buttons,
    },
    CommandDescriptor {
        keyword: "#BZR",
        arity: 1,
        build: build_set_buzzer,
    },
    CommandDescriptor {
        keyword: "#XRST",
        arity: 1,
        build: build_set_ext_reset,
    },
    CommandDescriptor {
        keyword: "#LDC",
        arity: 1,
        build: build_set_led_index,
    },
    CommandDescriptor {
        keyword: "#LDM",
        arity: 1,
        build: build_set_led_mode,
    },
    CommandDescriptor {
        keyword: "$ADC",
        arity: 0,
        build: build_read_adc,
    },
    CommandDescriptor {
        keyword: "$TMP",
        arity: 0,
        build: build_read_temperature,
    },
    CommandDescriptor {
        keyword: "#SYN",
        arity: 1,
        build: build_set_synth,
    },
    CommandDescriptor {
        keyword: "$FAN",
        arity: 0,
        build: build_read_fan,
    },
    CommandDescriptor {
        keyword: "#FAN",
        arity: 1,
        build: build_push_fan_temperature,
    },
];

#[cfg(test)]
#[allow(clippy::expect_used, clippy::panic)] // Tests use expect()/panic! for readable assertions
mod tests {
    use super::*;

    #[test]
    fn parse_bare_query() {
        assert_eq!(parse(ALL_COMMANDS, b"$HCI"), Ok(Command::GetHwConfig));
    }

    #[test]
    fn parse_set_with_flag() {
        assert_eq!(parse(ALL_COMMANDS, b"#BZR 1"), Ok(Command::SetBuzzer(true)));
        assert_eq!(
            parse(ALL_COMMANDS, b"#XRST 0"),
            Ok(Command::SetExtReset(false))
        );
    }

    #[test]
    fn parse_flag_rejects_non_binary() {
        assert_eq!(parse(ALL_COMMANDS, b"#BZR 2"), Err(ParseError::BadArgument));
        assert_eq!(
            parse(ALL_COMMANDS, b"#BZR on"),
            Err(ParseError::BadArgument)
        );
    }

    #[test]
    fn parse_shci_two_args() {
        let cmd = parse(ALL_COMMANDS, b"#SHCI 0 KT-956-0225-00").expect("well-formed");
        match cmd {
            Command::SetHwConfig { index, value } => {
                assert_eq!(index, 0);
                assert_eq!(value.as_str(), "KT-956-0225-00");
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn parse_shci_index_out_of_range() {
        assert_eq!(
            parse(ALL_COMMANDS, b"#SHCI 4 X"),
            Err(ParseError::BadArgument)
        );
    }

    #[test]
    fn parse_wrong_arity_is_error_not_crash() {
        assert_eq!(parse(ALL_COMMANDS, b"$HCI 1"), Err(ParseError::BadArity));
        assert_eq!(parse(ALL_COMMANDS, b"#BZR"), Err(ParseError::BadArity));
        assert_eq!(
            parse(ALL_COMMANDS, b"#SHCI 0 A B"),
            Err(ParseError::BadArity)
        );
    }

    #[test]
    fn parse_unknown_keyword() {
        assert_eq!(
            parse(ALL_COMMANDS, b"$NOPE"),
            Err(ParseError::UnknownCommand)
        );
    }

    #[test]
    fn parse_tolerates_repeated_whitespace() {
        assert_eq!(
            parse(ALL_COMMANDS, b"  #LDC   3 "),
            Ok(Command::SetLedIndex(3))
        );
    }

    #[test]
    fn parse_negative_temperature() {
        assert_eq!(
            parse(ALL_COMMANDS, b"#FAN -40"),
            Ok(Command::PushFanTemperature(-40))
        );
    }

    #[test]
    fn parse_u32_overflow_rejected() {
        assert_eq!(
            parse(ALL_COMMANDS, b"#SYN 99999999999"),
            Err(ParseError::BadArgument)
        );
    }
}
