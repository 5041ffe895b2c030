////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! Declaration templates.
//!
//! ```xml
//! <registry api="GL">
//!     <type name="GLhandleARB" kind="primitive" primitive="u32"/>
//!     <class name="ARB_sync" prefix="GL">
//!         <enum name="GL_SYNC_FLUSH_COMMANDS_BIT" value="0x00000001" type="GLbitfield"/>
//!         <command name="ClientWaitSync">
//!             <return type="GLenum"/>
//!             <param name="sync" type="GLsync"/>
//!             <param name="flags" type="GLbitfield"/>
//!             <param name="timeout" type="GLuint64"/>
//!         </command>
//!     </class>
//! </registry>
//! ```

use std::io;

use xml::{
    attribute::OwnedAttribute,
    reader::{EventReader, XmlEvent},
};

use super::{
    AutoSize, BaseType, Constant, DependsOn, Direction, Factor, FactorOp, FunctionDeclaration, FunctionTags,
    NativeClass, ParamTags, Parameter, PointerArray, Primitive, Registry, Returned, TypeTable,
};
use crate::{config::GenConfig, Charset, GenError};

/// A parsed element, attributes and children in document order.
#[derive(Debug, Default)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    fn get(&self, attribute: &str) -> Option<&str> {
        self.attributes.iter().find(|(name, _)| name == attribute).map(|(_, value)| &value[..])
    }

    fn require(&self, attribute: &'static str) -> Result<&str, GenError> {
        self.get(attribute).ok_or_else(|| GenError::MissingAttribute {
            element: self.name.clone(),
            attribute,
        })
    }

    fn invalid(&self, attribute: &str, value: &str, expected: &'static str) -> GenError {
        GenError::InvalidValue {
            element: self.name.clone(),
            attribute: attribute.to_owned(),
            value: value.to_owned(),
            expected,
        }
    }

    fn flag(&self, attribute: &str) -> Result<Option<bool>, GenError> {
        match self.get(attribute) {
            None => Ok(None),
            Some("true") => Ok(Some(true)),
            Some("false") => Ok(Some(false)),
            Some(other) => Err(self.invalid(attribute, other, "`true` or `false`")),
        }
    }

    fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    fn doc(&self) -> Option<String> {
        self.children("doc")
            .map(|doc| doc.text.split_whitespace().collect::<Vec<_>>().join(" "))
            .find(|text| !text.is_empty())
    }

    /// Logs attributes the loader does not know.
    fn warn_unknown(&self, known: &[&str]) {
        for (name, _) in &self.attributes {
            if !known.contains(&&name[..]) {
                warn!("ignoring unknown attribute `{}` on <{}>", name, self.name);
            }
        }
    }
}

fn attribute_pair(attribute: OwnedAttribute) -> (String, String) { (attribute.name.local_name, attribute.value) }

fn read_tree<R: io::Read>(src: R) -> Result<Element, GenError> {
    let mut stack: Vec<Element> = Vec::new();
    for event in EventReader::new(src) {
        match event? {
            XmlEvent::StartElement { name, attributes, .. } => stack.push(Element {
                name: name.local_name,
                attributes: attributes.into_iter().map(attribute_pair).collect(),
                ..Element::default()
            }),
            XmlEvent::EndElement { .. } => {
                let done = match stack.pop() {
                    Some(done) => done,
                    None => continue,
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(done),
                    None => return Ok(done),
                }
            },
            XmlEvent::Characters(text) | XmlEvent::CData(text) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text);
                }
            },
            _ => {},
        }
    }
    Err(GenError::InvalidValue {
        element: "document".to_owned(),
        attribute: "root".to_owned(),
        value: String::new(),
        expected: "a complete <registry> element",
    })
}

pub(super) fn from_xml<R: io::Read>(src: R, config: GenConfig) -> Result<Registry, GenError> {
    let root = read_tree(src)?;
    if root.name != "registry" {
        return Err(root.invalid("root", &root.name, "a <registry> root element"));
    }
    root.warn_unknown(&["api"]);

    let mut registry = Registry::new(root.require("api")?, config);
    for ty in root.children("type") {
        let (name, base) = parse_type(ty)?;
        registry.types.declare(name, base);
    }
    for class in root.children("class") {
        let class = parse_class(class, &registry.types)?;
        debug!("loaded {} with {} functions", class.cap_name(), class.functions.len());
        registry.classes.push(class);
    }
    Ok(registry)
}

fn parse_charset(element: &Element, attribute: &str) -> Result<Option<Charset>, GenError> {
    match element.get(attribute) {
        None => Ok(None),
        Some("ascii") => Ok(Some(Charset::Ascii)),
        Some("utf8") => Ok(Some(Charset::Utf8)),
        Some("utf16") => Ok(Some(Charset::Utf16)),
        Some(other) => Err(element.invalid(attribute, other, "`ascii`, `utf8` or `utf16`")),
    }
}

fn parse_type(element: &Element) -> Result<(String, BaseType), GenError> {
    element.warn_unknown(&["name", "kind", "primitive", "charset"]);
    let name = element.require("name")?;
    let base = match element.require("kind")? {
        "primitive" => {
            let prim = element.require("primitive")?;
            let prim = Primitive::from_rust_name(prim)
                .ok_or_else(|| element.invalid("primitive", prim, "a Rust primitive type"))?;
            BaseType::Primitive(prim)
        },
        "char" => BaseType::Char(parse_charset(element, "charset")?.unwrap_or(Charset::Utf8)),
        "opaque" => BaseType::Opaque,
        "struct" => BaseType::Struct,
        "callback" => BaseType::Callback,
        "void" => BaseType::Void,
        other => {
            let expected = "`primitive`, `char`, `opaque`, `struct`, `callback` or `void`";
            return Err(element.invalid("kind", other, expected));
        },
    };
    Ok((name.to_owned(), base))
}

fn parse_class(element: &Element, types: &TypeTable) -> Result<NativeClass, GenError> {
    element.warn_unknown(&["name", "prefix", "method-prefix", "platform-bound"]);
    let mut class = NativeClass::new(element.require("name")?, element.require("prefix")?);
    if let Some(method) = element.get("method-prefix") {
        class.prefix_method = method.to_owned();
    }
    class.platform_bound = element.flag("platform-bound")?.unwrap_or(false);
    class.documentation = element.doc();

    for constant in element.children("enum") {
        constant.warn_unknown(&["name", "value", "type"]);
        let ty = constant.get("type").unwrap_or("GLenum");
        types.parse(ty)?;
        class.constants.push(Constant {
            name: constant.require("name")?.to_owned(),
            value: constant.require("value")?.to_owned(),
            ty: ty.to_owned(),
        });
    }
    for command in element.children("command") {
        class.functions.push(parse_command(command, types)?);
    }
    Ok(class)
}

fn parse_command(element: &Element, types: &TypeTable) -> Result<FunctionDeclaration, GenError> {
    element.warn_unknown(&["name", "deprecated", "ignore-missing", "depends-on", "map-pointer"]);
    let ret = match element.children("return").next() {
        Some(ret) => types.parse(ret.require("type")?)?,
        None => super::NativeType::Void,
    };
    let mut params = Vec::new();
    for param in element.children("param") {
        params.push(parse_param(param, types)?);
    }

    let mut function = FunctionDeclaration::new(element.require("name")?, ret, params);
    function.documentation = element.doc();
    function.tags = FunctionTags {
        depends_on: match element.get("depends-on") {
            Some(src) => Some(
                DependsOn::parse(src)
                    .ok_or_else(|| element.invalid("depends-on", src, "one or more extension names"))?,
            ),
            None => None,
        },
        deprecated: element.flag("deprecated")?.unwrap_or(false),
        ignore_missing: element.flag("ignore-missing")?.unwrap_or(false),
        map_pointer: element.get("map-pointer").map(str::to_owned),
    };
    Ok(function)
}

const PARAM_ATTRIBUTES: &[&str] = &[
    "name",
    "type",
    "direction",
    "nullable",
    "auto-size",
    "factor",
    "auto-size-shr",
    "null-terminated",
    "charset",
    "pointer-array",
    "single-name",
    "lengths",
    "returned",
    "return-length",
    "max-length",
    "single-value",
    "vector-name",
    "vector-size",
    "expression",
    "keep",
];

fn parse_param(element: &Element, types: &TypeTable) -> Result<Parameter, GenError> {
    element.warn_unknown(PARAM_ATTRIBUTES);
    let name = element.require("name")?;
    let ty = types.parse(element.require("type")?)?;

    let mut tags = ParamTags::default();
    tags.nullable = element.flag("nullable")?.unwrap_or(false);
    tags.null_terminated = element.flag("null-terminated")?;
    tags.charset = parse_charset(element, "charset")?;

    if let Some(buffers) = element.get("auto-size") {
        let mut buffers = buffers.split_whitespace().map(str::to_owned);
        let buffer = buffers.next().ok_or_else(|| element.invalid("auto-size", "", "one or more parameter names"))?;
        let factor = match (element.get("factor"), element.get("auto-size-shr")) {
            (Some(_), Some(_)) => {
                return Err(element.invalid("auto-size-shr", "", "either `factor` or `auto-size-shr`, not both"));
            },
            (Some(factor), None) => Some(
                Factor::parse(factor)
                    .ok_or_else(|| element.invalid("factor", factor, "an operator and an operand, e.g. `*2`"))?,
            ),
            (None, Some(shift)) => Some(Factor {
                op: FactorOp::Shr,
                operand: shift.to_owned(),
            }),
            (None, None) => None,
        };
        tags.auto_size = Some(AutoSize {
            buffer,
            checked: buffers.collect(),
            factor,
        });
    }

    if let Some(element_type) = element.get("pointer-array") {
        tags.pointer_array = Some(PointerArray {
            element: types.parse(element_type)?,
            single_name: element.get("single-name").map(str::to_owned),
            lengths: element.get("lengths").map(str::to_owned),
        });
    }

    if element.flag("returned")?.unwrap_or(false) {
        let max_length = match element.get("max-length") {
            Some(max) => {
                Some(max.parse::<usize>().map_err(|_| element.invalid("max-length", max, "an element count"))?)
            },
            None => None,
        };
        tags.returned = Some(Returned {
            length: element.get("return-length").map(str::to_owned),
            max_length,
        });
    }

    tags.single_value = element.get("single-value").map(str::to_owned);
    if let Some(vector) = element.get("vector-name") {
        let size = element.require("vector-size")?;
        let size = size.parse::<usize>().map_err(|_| element.invalid("vector-size", size, "a component count"))?;
        tags.vector = Some((vector.to_owned(), size));
    }
    if let Some(expression) = element.get("expression") {
        tags.expression = Some((expression.to_owned(), element.flag("keep")?.unwrap_or(false)));
    }

    let direction = match element.get("direction") {
        Some("in") => Direction::In,
        Some("out") => Direction::Out,
        Some("inout") => Direction::InOut,
        Some(other) => return Err(element.invalid("direction", other, "`in`, `out` or `inout`")),
        None if tags.returned.is_some() => Direction::Out,
        None => Direction::In,
    };

    Ok(Parameter {
        name: name.to_owned(),
        ty,
        direction,
        tags,
        documentation: element.doc(),
    })
}
