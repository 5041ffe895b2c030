////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

use std::io;

use thiserror::Error;

/// A declaration the generator cannot turn into bindings. Generation stops at the first one.
#[derive(Debug, Error)]
pub enum GenError {
    #[error("malformed declaration template: {0}")]
    Xml(#[from] xml::reader::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("<{element}> is missing the `{attribute}` attribute")]
    MissingAttribute { element: String, attribute: &'static str },
    #[error("invalid value {value:?} for `{attribute}` on <{element}>, expected {expected}")]
    InvalidValue {
        element: String,
        attribute: String,
        value: String,
        expected: &'static str,
    },
    #[error("unknown type `{0}`")]
    UnknownType(String),
    #[error("{function}: parameter `{param}` references `{referenced}`, which does not exist")]
    UnknownParameter { function: String, param: String, referenced: String },
    #[error("{function}: parameter `{param}`: {reason}")]
    ContradictoryTags { function: String, param: String, reason: String },
    #[error("class {class}: unrecognized platform prefix `{prefix}`")]
    UnrecognizedPrefix { class: String, prefix: String },
    #[error("duplicate {kind} `{name}`")]
    Duplicate { kind: &'static str, name: String },
    #[error("{function} is declared differently in {first} and {second}")]
    Conflict { function: String, first: String, second: String },
}

impl GenError {
    pub(crate) fn contradiction<R: Into<String>>(function: &str, param: &str, reason: R) -> GenError {
        GenError::ContradictoryTags {
            function: function.to_owned(),
            param: param.to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown_param(function: &str, param: &str, referenced: &str) -> GenError {
        GenError::UnknownParameter {
            function: function.to_owned(),
            param: param.to_owned(),
            referenced: referenced.to_owned(),
        }
    }
}
