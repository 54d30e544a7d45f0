//! Recovery of parameter index variables from asyn driver source, and the
//! rewrite of that source to use a generated ParamSet.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::{ConvertError, Result};
use crate::producer::param_set_name;

static PATTERNS: Lazy<std::result::Result<Patterns, regex::Error>> = Lazy::new(Patterns::new);

struct Patterns {
    // class epicsShareClass NDPluginDriver : public asynNDArrayDriver, public epicsThreadRunable {
    class: Regex,
    // #define SimGainXString                "SIM_GAIN_X";
    define_line: Regex,
    define: Regex,
    // createParam(SimGainXString, asynParamFloat64, &SimGainX);
    create_param: Regex,
    declaration: Regex,
    // #define FIRST_SIM_DETECTOR_PARAM SimGainX
    first_param: Regex,
}

impl Patterns {
    fn new() -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            class: Regex::new(r"class\b.*?\s(\w+)\s*:\s*\w+\s+(\w+)")?,
            define_line: Regex::new(r#"#define[ \t]+\w+[ \t]+"[^"]*".*"#)?,
            define: Regex::new(r#"#define[ \t]+(\w+)[ \t]+"([^"]*)""#)?,
            create_param: Regex::new(r"((?:this->)?createParam\(([^)]*)\);.*)")?,
            declaration: Regex::new(r"^\s*int\s+(\w+)\s*;")?,
            first_param: Regex::new(r"(#define[ \t]+FIRST_\w+_PARAM)[ \t]+\w+")?,
        })
    }

    fn get() -> Result<&'static Self> {
        PATTERNS.as_ref().map_err(|err| ConvertError::Regex(err.clone()))
    }
}

/// A `createParam` call and the define and index variable it links.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CreateParam {
    call: String,
    string: String,
    index: String,
}

/// Rewritten driver source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenSource {
    pub cpp: String,
    pub h: String,
}

/// Scans the source and header of an asyn driver for the parameters whose
/// driver info strings are known from its templates.
#[derive(Debug, Clone)]
pub struct SourceConverter {
    cpp: String,
    h: String,
    device_class: String,
    parent_class: String,
    /// Define lines kept, with define name → driver info.
    defines: Vec<(String, String, String)>,
    create_params: Vec<CreateParam>,
    declarations: Vec<String>,
}

impl SourceConverter {
    /// Extracts the class, defines, `createParam` calls and index
    /// declarations belonging to `drv_infos`.
    pub fn new(cpp: impl Into<String>, h: impl Into<String>, drv_infos: &[String]) -> Result<Self> {
        let cpp = cpp.into();
        let h = h.into();

        let patterns = Patterns::get()?;

        let captures = patterns.class.captures(&h).ok_or(ConvertError::MissingClass)?;
        let device_class = captures[1].to_string();
        let parent_class = captures[2].to_string();
        debug!(%device_class, %parent_class, "found driver class");

        let defines: Vec<(String, String, String)> = patterns
            .define_line
            .find_iter(&h)
            .filter_map(|line| {
                let captures = patterns.define.captures(line.as_str())?;
                let value = &captures[2];
                drv_infos
                    .iter()
                    .any(|info| info == value)
                    .then(|| (line.as_str().to_string(), captures[1].to_string(), value.to_string()))
            })
            .collect();

        let mut create_params = Vec::new();
        for captures in patterns.create_param.captures_iter(&cpp) {
            let call = captures[1].to_string();
            if !defines.iter().any(|(_, name, _)| call.contains(name.as_str())) {
                continue;
            }
            let args: String = captures[2].chars().filter(|c| *c != ' ').collect();
            let args: Vec<&str> = args.split(',').collect();
            let [string, _, index] = &args[args.len().saturating_sub(3)..] else {
                continue;
            };
            create_params.push(CreateParam {
                call,
                string: string.to_string(),
                index: index.trim_start_matches('&').to_string(),
            });
        }

        let declarations = h
            .lines()
            .filter(|line| {
                patterns
                    .declaration
                    .captures(line)
                    .is_some_and(|c| create_params.iter().any(|p| p.index == c[1]))
            })
            .map(|line| line.trim().to_string())
            .collect();

        Ok(Self {
            cpp,
            h,
            device_class,
            parent_class,
            defines,
            create_params,
            declarations,
        })
    }

    /// The driver class, e.g. `simDetector`.
    #[must_use]
    pub fn device_class(&self) -> &str {
        &self.device_class
    }

    /// Its base class, e.g. `ADDriver`.
    #[must_use]
    pub fn parent_class(&self) -> &str {
        &self.parent_class
    }

    /// Driver info string → index variable, in `createParam` order.
    pub fn info_index_map(&self) -> Result<IndexMap<String, String>> {
        self.create_params
            .iter()
            .map(|param| {
                self.defines
                    .iter()
                    .find(|(_, name, _)| *name == param.string)
                    .map(|(_, _, info)| (info.clone(), param.index.clone()))
                    .ok_or_else(|| ConvertError::MissingDefine {
                        string: param.string.clone(),
                        index: param.index.clone(),
                    })
            })
            .collect()
    }

    /// Rewrites the source to hold its parameters in a ParamSet.
    ///
    /// `parent_indexes` are the index variables of the parent drivers, which
    /// also move behind the ParamSet.
    pub fn rewrite(&self, parent_indexes: &[String]) -> Result<RewrittenSource> {
        Ok(RewrittenSource {
            cpp: self.rewrite_cpp(parent_indexes)?,
            h: self.rewrite_h()?,
        })
    }

    fn rewrite_cpp(&self, parent_indexes: &[String]) -> Result<String> {
        let device = &self.device_class;
        let parent = &self.parent_class;

        let mut text = keep_lines(&self.cpp, |line| {
            !self
                .create_params
                .iter()
                .any(|param| line.trim_start() == param.call.trim_start())
        });

        let indexes = self
            .create_params
            .iter()
            .map(|param| param.index.as_str())
            .chain(parent_indexes.iter().map(String::as_str));
        for index in indexes {
            let re = Regex::new(&format!(r"(\W){}(\W)", regex::escape(index)))?;
            text = re
                .replace_all(&text, format!("${{1}}paramSet->{index}${{2}}").as_str())
                .into_owned();
        }

        text = text.replace(
            &format!("::{device}("),
            &format!("::{device}({device}ParamSet* paramSet, "),
        );
        text = text.replace(
            &format!("new {device}("),
            &format!("{device}ParamSet* paramSet = new {device}ParamSet;\n    new {device}(paramSet, "),
        );
        text = text.replace(
            &format!("{parent}("),
            &format!("{parent}(static_cast<{}*>(paramSet), ", param_set_name(parent)),
        );
        let initialiser = Regex::new(&format!(r"(::{}\([^{{]+\))(\s*)\{{", regex::escape(device)))?;
        Ok(initialiser
            .replace(&text, "${1},\n    paramSet(paramSet)${2}{")
            .into_owned())
    }

    fn rewrite_h(&self) -> Result<String> {
        let device = &self.device_class;
        let parent = &self.parent_class;

        let mut text = keep_lines(&self.h, |line| {
            let line = line.trim();
            !self.defines.iter().any(|(define, _, _)| define.trim() == line)
                && !self.declarations.iter().any(|declaration| declaration == line)
        });

        text = text.replace(
            &format!(" {device}("),
            &format!(" {device}({device}ParamSet* paramSet, "),
        );

        let include = format!("#include \"{parent}.h\"");
        let at = text
            .find(&include)
            .ok_or_else(|| ConvertError::MissingParentInclude {
                parent: parent.clone(),
            })?;
        text.insert_str(at, &format!("#include \"{device}ParamSet.h\"\n"));

        const PROTECTED: &str = "protected:";
        let protected = text
            .lines()
            .find_map(|line| line.find(PROTECTED).map(|at| line[..at + PROTECTED.len()].to_string()))
            .ok_or(ConvertError::MissingProtected)?;
        text = text.replacen(
            &protected,
            &format!("{protected}\n    {device}ParamSet* paramSet;"),
            1,
        );

        let first = format!(
            "${{1}} paramSet->FIRST_{}PARAMSET_PARAM",
            device.to_ascii_uppercase()
        );
        Ok(Patterns::get()?
            .first_param
            .replace_all(&text, first.as_str())
            .into_owned())
    }
}

/// Rebuilds `text` from the lines `keep` accepts, preserving a trailing
/// newline.
fn keep_lines(text: &str, keep: impl Fn(&str) -> bool) -> String {
    let mut out = text.lines().filter(|line| keep(line)).collect::<Vec<_>>().join("\n");
    if text.ends_with('\n') {
        out.push('\n');
    }
    out
}
