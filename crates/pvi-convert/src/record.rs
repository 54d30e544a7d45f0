//! Database records and the asyn records the classifier works on.

use std::fmt;

use indexmap::IndexMap;

/// A record instance as declared in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Full record name as written, macros included.
    pub name: String,
    /// Record type, e.g. `ai`.
    pub record_type: String,
    /// Fields in declaration order.
    pub fields: IndexMap<String, String>,
    /// Info tags in declaration order.
    pub infos: IndexMap<String, String>,
}

impl Record {
    /// A record without fields.
    #[must_use]
    pub fn new(record_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            record_type: record_type.into(),
            fields: IndexMap::new(),
            infos: IndexMap::new(),
        }
    }

    /// Adds a field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Adds an info tag.
    #[must_use]
    pub fn with_info(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.infos.insert(name.into(), value.into());
        self
    }

    /// The value of field `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// The record name after its leading macro references:
    /// `$(P)$(R)Gain_RBV` → `Gain_RBV`.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.name[self.prefix().len()..]
    }

    /// The leading macro references of the record name: `$(P)$(R)`.
    #[must_use]
    pub fn prefix(&self) -> &str {
        let mut end = 0;
        let bytes = self.name.as_bytes();
        while bytes.get(end) == Some(&b'$') {
            let close = match bytes.get(end + 1) {
                Some(b'(') => b')',
                Some(b'{') => b'}',
                _ => break,
            };
            match self.name[end..].find(close as char) {
                Some(offset) => end += offset + 1,
                None => break,
            }
        }
        &self.name[..end]
    }

    /// The declaration line, `record(type, "name")`.
    #[must_use]
    pub fn header(&self) -> String {
        format!("record({}, \"{}\")", self.record_type, self.name)
    }
}

/// Whether a record reads from or writes to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Input record.
    Read,
    /// Output record.
    Write,
}

/// Why a record is not an asyn record. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Neither INP nor OUT.
    NoLink,
    /// Both INP and OUT.
    BothLinks,
    /// The link has no `@asyn(` directive.
    NotAsyn,
    /// The directive is not followed by a driver info string.
    NoDriverInfo,
    /// Motor records are driven by their own device support.
    Motor { header: String },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoLink | Self::BothLinks => {
                f.write_str("Record has no input or output field or both")
            }
            Self::NotAsyn => f.write_str("Record has no @asyn field"),
            Self::NoDriverInfo => f.write_str("Record has no driver info after @asyn(...)"),
            Self::Motor { header } => write!(f, "Record `{header}` is type motor - ignoring"),
        }
    }
}

/// Port, address and timeout of an `@asyn(...)` directive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AsynMacros {
    pub port: String,
    pub address: String,
    pub timeout: String,
}

impl Default for AsynMacros {
    fn default() -> Self {
        Self {
            port: "$(PORT)".to_string(),
            address: "$(ADDR=0)".to_string(),
            timeout: "$(TIMEOUT=1)".to_string(),
        }
    }
}

impl AsynMacros {
    /// The directive, `@asyn(port,address,timeout)`.
    #[must_use]
    pub fn directive(&self) -> String {
        format!("@asyn({},{},{})", self.port, self.address, self.timeout)
    }
}

/// A record with exactly one of INP/OUT, linked to a driver parameter through
/// an `@asyn(...)` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsynRecord {
    record: Record,
    join_key: String,
}

impl AsynRecord {
    /// Validates `record`. A missing DESC defaults to the record name.
    pub fn new(mut record: Record) -> Result<Self, Rejection> {
        if record.record_type == "motor" {
            return Err(Rejection::Motor {
                header: record.header(),
            });
        }

        let link = match (record.field("INP"), record.field("OUT")) {
            (Some(_), Some(_)) => return Err(Rejection::BothLinks),
            (None, None) => return Err(Rejection::NoLink),
            (Some(link), None) | (None, Some(link)) => link,
        };

        let directive = AsynDirective::parse(link).ok_or(Rejection::NotAsyn)?;
        let join_key = directive
            .drv_info
            .ok_or(Rejection::NoDriverInfo)?
            .to_string();

        if !record.fields.contains_key("DESC") {
            let name = record.name.clone();
            record.fields.insert("DESC".to_string(), name);
        }

        Ok(Self { record, join_key })
    }

    /// The underlying record.
    #[must_use]
    pub fn record(&self) -> &Record {
        &self.record
    }

    pub(crate) fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }

    /// Read or write, from the link field. Waveforms always link through INP,
    /// so a waveform whose DTYP is `asynOctetWrite` or ends in `ArrayOut`
    /// is a write record.
    #[must_use]
    pub fn role(&self) -> Role {
        if self.record.fields.contains_key("OUT") {
            return Role::Write;
        }
        let dtyp = self.record.field("DTYP").unwrap_or_default();
        if self.record.record_type == "waveform"
            && (dtyp == "asynOctetWrite" || dtyp.ends_with("ArrayOut"))
        {
            Role::Write
        } else {
            Role::Read
        }
    }

    /// The driver info string following the directive, shared by the read
    /// and write records of one parameter.
    #[must_use]
    pub fn join_key(&self) -> &str {
        &self.join_key
    }

    /// The INP or OUT value.
    #[must_use]
    pub fn link(&self) -> &str {
        self.record
            .field("INP")
            .or_else(|| self.record.field("OUT"))
            .unwrap_or_default()
    }

    /// Port, address and timeout of the directive, defaults filling any
    /// missing trailing argument.
    #[must_use]
    pub fn asyn_macros(&self) -> AsynMacros {
        let mut macros = AsynMacros::default();
        if let Some(directive) = AsynDirective::parse(self.link()) {
            let mut args = directive.args.into_iter();
            for slot in [&mut macros.port, &mut macros.address, &mut macros.timeout] {
                if let Some(arg) = args.next() {
                    *slot = arg.to_string();
                }
            }
        }
        macros
    }

    /// Shorthand for the record name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.record.name
    }

    /// Shorthand for the record suffix.
    #[must_use]
    pub fn suffix(&self) -> &str {
        self.record.suffix()
    }
}

struct AsynDirective<'a> {
    args: Vec<&'a str>,
    drv_info: Option<&'a str>,
}

impl<'a> AsynDirective<'a> {
    /// Splits `@asyn($(PORT),$(ADDR=0),$(TIMEOUT=1))FILE_PATH` into its
    /// arguments and the driver info string. Parentheses of macro references
    /// nest inside the directive.
    fn parse(link: &'a str) -> Option<Self> {
        const START: &str = "@asyn(";
        let open = link.find(START)? + START.len();

        let mut depth = 1usize;
        let mut args = Vec::new();
        let mut arg_start = open;
        let mut close = None;
        for (offset, c) in link[open..].char_indices() {
            let index = open + offset;
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(index);
                        break;
                    }
                }
                ',' if depth == 1 => {
                    args.push(link[arg_start..index].trim());
                    arg_start = index + 1;
                }
                _ => {}
            }
        }

        let close = close?;
        let last = link[arg_start..close].trim();
        if !last.is_empty() || !args.is_empty() {
            args.push(last);
        }

        let drv_info = link[close + 1..]
            .split(char::is_whitespace)
            .next()
            .filter(|token| !token.is_empty());

        Some(Self { args, drv_info })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asyn(record_type: &str, name: &str, field: &str, link: &str) -> Record {
        Record::new(record_type, name).with_field(field, link)
    }

    #[test]
    fn test_prefix_and_suffix() {
        let record = Record::new("ai", "$(P)$(R)Gain_RBV");
        assert_eq!(record.prefix(), "$(P)$(R)");
        assert_eq!(record.suffix(), "Gain_RBV");

        let braces = Record::new("ai", "${P}Temp");
        assert_eq!(braces.suffix(), "Temp");

        let bare = Record::new("ai", "XF:31ID$(R)Temp");
        assert_eq!(bare.prefix(), "");
    }

    #[test]
    fn test_join_key() {
        let record = AsynRecord::new(asyn(
            "waveform",
            "$(P)$(R)FilePath",
            "INP",
            "@asyn($(PORT),$(ADDR=0),$(TIMEOUT=1))FILE_PATH",
        ))
        .expect("asyn record");
        assert_eq!(record.join_key(), "FILE_PATH");
        assert_eq!(
            record.asyn_macros(),
            AsynMacros {
                port: "$(PORT)".to_string(),
                address: "$(ADDR=0)".to_string(),
                timeout: "$(TIMEOUT=1)".to_string(),
            }
        );
    }

    #[test]
    fn test_short_directive_uses_default_macros() {
        let record = AsynRecord::new(asyn("bo", "$(P)Go", "OUT", "@asyn($(PORT))GO"))
            .expect("asyn record");
        let macros = record.asyn_macros();
        assert_eq!(macros.port, "$(PORT)");
        assert_eq!(macros.address, "$(ADDR=0)");
        assert_eq!(macros.directive(), "@asyn($(PORT),$(ADDR=0),$(TIMEOUT=1))");
    }

    #[test]
    fn test_rejections() {
        let both = Record::new("ai", "$(P)X")
            .with_field("INP", "@asyn($(PORT))X")
            .with_field("OUT", "@asyn($(PORT))X");
        assert_eq!(AsynRecord::new(both), Err(Rejection::BothLinks));

        let neither = Record::new("calc", "$(P)Sum").with_field("CALC", "A+B");
        assert_eq!(AsynRecord::new(neither), Err(Rejection::NoLink));

        let soft = asyn("ai", "$(P)Soft", "INP", "$(P)Other CP");
        assert_eq!(AsynRecord::new(soft), Err(Rejection::NotAsyn));

        let motor = asyn("motor", "$(P)$(M)", "OUT", "@asyn($(PORT),0)");
        let err = AsynRecord::new(motor).expect_err("motor");
        assert_eq!(
            err.to_string(),
            "Record `record(motor, \"$(P)$(M)\")` is type motor - ignoring"
        );
    }

    #[test]
    fn test_desc_defaults_to_name() {
        let record = AsynRecord::new(asyn("bo", "$(P)Go", "OUT", "@asyn($(PORT))GO"))
            .expect("asyn record");
        assert_eq!(record.record().field("DESC"), Some("$(P)Go"));
    }

    #[test]
    fn test_waveform_write_role() {
        let octet = Record::new("waveform", "$(P)FilePath")
            .with_field("DTYP", "asynOctetWrite")
            .with_field("INP", "@asyn($(PORT))FILE_PATH");
        assert_eq!(AsynRecord::new(octet).map(|r| r.role()), Ok(Role::Write));

        let array = Record::new("waveform", "$(P)Array")
            .with_field("DTYP", "asynFloat64ArrayOut")
            .with_field("INP", "@asyn($(PORT))ARRAY");
        assert_eq!(AsynRecord::new(array).map(|r| r.role()), Ok(Role::Write));

        let read = Record::new("waveform", "$(P)FilePath_RBV")
            .with_field("DTYP", "asynOctetRead")
            .with_field("INP", "@asyn($(PORT))FILE_PATH");
        assert_eq!(AsynRecord::new(read).map(|r| r.role()), Ok(Role::Read));
    }
}
