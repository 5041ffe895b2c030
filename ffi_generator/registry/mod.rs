////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! The declarations a generator works from.

use std::{collections::BTreeMap, io};

use crate::{
    config::GenConfig,
    generators::Generator,
    transforms::{self, FunctionTransforms},
    Charset, GenError, Platform,
};

mod parse;
pub mod types;

pub use self::types::{BaseType, NativeType, Primitive, TypeTable};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
    InOut,
}

/// `AutoSize` and `AutoSizeShr`: the parameter is the element count of another one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutoSize {
    /// The buffer the size is taken from.
    pub buffer: String,
    /// Further buffers that must hold at least that many elements.
    pub checked: Vec<String>,
    pub factor: Option<Factor>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FactorOp {
    Mul,
    Div,
    Shl,
    Shr,
}

/// A scaling applied to an auto-size expression, e.g. `>> typeToByteShift(type)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Factor {
    pub op: FactorOp,
    pub operand: String,
}

impl Factor {
    /// Parses `*2`, `/ 4`, `<<3` or `>> shift(type)`.
    pub fn parse(src: &str) -> Option<Factor> {
        let src = src.trim();
        let (op, rest) = if src.starts_with("<<") {
            (FactorOp::Shl, &src[2..])
        } else if src.starts_with(">>") {
            (FactorOp::Shr, &src[2..])
        } else if src.starts_with('*') {
            (FactorOp::Mul, &src[1..])
        } else if src.starts_with('/') {
            (FactorOp::Div, &src[1..])
        } else {
            return None;
        };
        let operand = rest.trim();
        if operand.is_empty() {
            return None;
        }
        Some(Factor {
            op,
            operand: operand.to_owned(),
        })
    }

    pub fn apply(&self, expression: &str) -> String {
        let op = match self.op {
            FactorOp::Mul => "*",
            FactorOp::Div => "/",
            FactorOp::Shl => "<<",
            FactorOp::Shr => ">>",
        };
        format!("({} {} ({}))", expression, op, self.operand)
    }
}

/// `PointerArray`: an array of pointers the caller passes as a slice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PointerArray {
    pub element: NativeType,
    /// Set when the single-element form is generated instead, named this.
    pub single_name: Option<String>,
    /// The parameter receiving the element lengths, if any.
    pub lengths: Option<String>,
}

/// How much room the scratch buffer of a returned parameter gets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Capacity {
    /// A compile-time element count.
    Constant(usize),
    /// Whatever the caller passes in this parameter.
    Param(String),
}

/// Marks an output parameter whose contents become the return value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Returned {
    /// Length output parameter, consumed by the return value.
    pub length: Option<String>,
    /// Explicit capacity, used when no parameter is an auto-size of this one.
    pub max_length: Option<usize>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParamTags {
    pub auto_size: Option<AutoSize>,
    pub nullable: bool,
    /// Overrides the null-termination of strings. Defaults to terminated.
    pub null_terminated: Option<bool>,
    pub charset: Option<Charset>,
    pub pointer_array: Option<PointerArray>,
    pub returned: Option<Returned>,
    pub single_value: Option<String>,
    pub vector: Option<(String, usize)>,
    /// Replaces the argument with an expression, keeping the parameter in the signature if set.
    pub expression: Option<(String, bool)>,
}

/// Names that cannot be used as parameter names in generated code: Rust keywords, reserved
/// words, and the locals every generated function declares.
const RESERVED: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "caps", "const", "continue", "crate", "do", "dyn",
    "else", "enum", "extern", "false", "final", "fn", "for", "if", "impl", "in", "let", "loop", "macro", "match",
    "mod", "move", "mut", "override", "priv", "pub", "ref", "return", "self", "Self", "static", "struct", "super",
    "trait", "true", "try", "type", "typeof", "union", "unsafe", "unsized", "use", "virtual", "where", "while",
    "yield",
];

/// `name` as a Rust identifier. Reserved names get a trailing underscore, `type` becomes `type_`.
pub fn rust_ident(name: &str) -> String {
    if RESERVED.contains(&name) {
        format!("{}_", name)
    } else {
        name.to_owned()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub ty: NativeType,
    pub direction: Direction,
    pub tags: ParamTags,
    pub documentation: Option<String>,
}

impl Parameter {
    pub fn new<S: Into<String>>(name: S, ty: NativeType) -> Parameter {
        Parameter {
            name: name.into(),
            ty,
            direction: Direction::In,
            tags: ParamTags::default(),
            documentation: None,
        }
    }

    /// Mostly for tests and programmatic templates.
    pub fn with_tags(mut self, tags: ParamTags) -> Parameter {
        self.tags = tags;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Parameter {
        self.direction = direction;
        self
    }

    /// The name as it appears in generated code.
    pub fn ident(&self) -> String { rust_ident(&self.name) }

    pub fn charset(&self) -> Option<Charset> {
        match self.ty {
            NativeType::CharSequence { charset, .. } => Some(self.tags.charset.unwrap_or(charset)),
            _ => self.tags.charset,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FunctionTags {
    pub depends_on: Option<DependsOn>,
    /// `DeprecatedGL`: absent from forward compatible contexts.
    pub deprecated: bool,
    pub ignore_missing: bool,
    /// `MapPointer`: the returned pointer maps this many bytes.
    pub map_pointer: Option<String>,
}

/// A `depends-on` condition, emitted as an `ffi_runtime::Dependency`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DependsOn {
    Extension(String),
    AnyOf(Vec<String>),
}

impl DependsOn {
    /// Parses `GL_ARB_foo` or `GL_ARB_foo | GL_EXT_foo`.
    pub fn parse(src: &str) -> Option<DependsOn> {
        let names: Vec<String> = src.split('|').map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned).collect();
        match names.len() {
            0 => None,
            1 => names.into_iter().next().map(DependsOn::Extension),
            _ => Some(DependsOn::AnyOf(names)),
        }
    }

    pub fn satisfied_by<F: Fn(&str) -> bool>(&self, present: F) -> bool {
        match self {
            DependsOn::Extension(name) => present(name),
            DependsOn::AnyOf(names) => names.iter().any(|name| present(name)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReturnValue {
    pub ty: NativeType,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionDeclaration {
    /// Name without the class prefix, e.g. `FenceSync`.
    pub name: String,
    pub documentation: Option<String>,
    pub ret: ReturnValue,
    pub params: Vec<Parameter>,
    pub tags: FunctionTags,
}

impl FunctionDeclaration {
    pub fn new<S: Into<String>>(name: S, ret: NativeType, params: Vec<Parameter>) -> FunctionDeclaration {
        FunctionDeclaration {
            name: name.into(),
            documentation: None,
            ret: ReturnValue { ty: ret },
            params,
            tags: FunctionTags::default(),
        }
    }

    pub fn param(&self, name: &str) -> Option<&Parameter> { self.params.iter().find(|p| p.name == name) }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constant {
    pub name: String,
    pub value: String,
    pub ty: String,
}

/// A core version or an extension: a group of constants and functions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NativeClass {
    /// `GL11`, `ARB_sync`, ...
    pub template_name: String,
    /// `GL`, `GLX`, `WGL`, `AL`, ...
    pub prefix: String,
    /// Prepended to function names: `gl`, `glX`, `wgl`, `al`, ...
    pub prefix_method: String,
    pub documentation: Option<String>,
    /// Set for window-system classes (GLX, WGL, CGL) whose entry points exist on one platform only.
    pub platform_bound: bool,
    pub constants: Vec<Constant>,
    pub functions: Vec<FunctionDeclaration>,
}

impl NativeClass {
    pub fn new<S: Into<String>, P: Into<String>>(template_name: S, prefix: P) -> NativeClass {
        let prefix = prefix.into();
        NativeClass {
            template_name: template_name.into(),
            prefix_method: prefix.to_lowercase(),
            prefix,
            documentation: None,
            platform_bound: false,
            constants: Vec::new(),
            functions: Vec::new(),
        }
    }

    /// The name of the class in the capability table and the hint set.
    pub fn cap_name(&self) -> String {
        if self.template_name.starts_with(&self.prefix) {
            if self.prefix == "GL" {
                format!("OpenGL{}", &self.template_name[2..])
            } else {
                self.template_name.clone()
            }
        } else {
            format!("{}_{}", self.prefix, self.template_name)
        }
    }

    /// The name the native library exports a function under.
    pub fn native_name(&self, function: &FunctionDeclaration) -> String {
        format!("{}{}", self.prefix_method, function.name)
    }

    /// The platform the class' entry points are bound to, from the method prefix.
    pub fn platform(&self) -> Option<Platform> {
        match &self.prefix_method[..] {
            "glX" => Some(Platform::Linux),
            "wgl" => Some(Platform::Windows),
            "CGL" => Some(Platform::MacOsx),
            _ => None,
        }
    }
}

/// A function together with the class declaring it.
#[derive(Copy, Clone, Debug)]
pub struct ClassFunction<'a> {
    pub class: &'a NativeClass,
    pub function: &'a FunctionDeclaration,
}

impl<'a> ClassFunction<'a> {
    pub fn native_name(&self) -> String { self.class.native_name(self.function) }
}

#[derive(Clone, Debug)]
pub struct Registry {
    /// Used in diagnostics and generated names, e.g. `GL`.
    pub api: String,
    pub classes: Vec<NativeClass>,
    pub types: TypeTable,
    pub config: GenConfig,
}

impl Registry {
    pub fn new<S: Into<String>>(api: S, config: GenConfig) -> Registry {
        Registry {
            api: api.into(),
            classes: Vec::new(),
            types: TypeTable::new(),
            config,
        }
    }

    /// Loads an XML declaration template.
    pub fn from_xml<R: io::Read>(src: R, config: GenConfig) -> Result<Registry, GenError> {
        parse::from_xml(src, config)
    }

    pub fn functions(&self) -> impl Iterator<Item = ClassFunction<'_>> + '_ {
        self.classes
            .iter()
            .flat_map(|class| class.functions.iter().map(move |function| ClassFunction { class, function }))
    }

    /// Distinct functions by native name, sorted. The order of the capability table.
    pub fn distinct_functions(&self) -> Vec<ClassFunction<'_>> {
        let mut distinct = BTreeMap::new();
        for f in self.functions() {
            distinct.entry(f.native_name()).or_insert(f);
        }
        distinct.into_iter().map(|(_, f)| f).collect()
    }

    /// Index of `native_name` in [`Registry::distinct_functions`].
    pub fn function_index(&self, native_name: &str) -> Option<usize> {
        self.distinct_functions().iter().position(|f| f.native_name() == native_name)
    }

    pub fn transforms(&self, f: ClassFunction<'_>) -> Result<FunctionTransforms, GenError> {
        transforms::select_transforms(f.class, f.function, &self.config)
    }

    /// Checks every declaration, returning the first configuration error.
    pub fn validate(&self) -> Result<(), GenError> {
        let mut classes = BTreeMap::new();
        for class in &self.classes {
            if class.platform_bound && class.platform().is_none() {
                return Err(GenError::UnrecognizedPrefix {
                    class: class.cap_name(),
                    prefix: class.prefix_method.clone(),
                });
            }
            if classes.insert(class.cap_name(), ()).is_some() {
                return Err(GenError::Duplicate {
                    kind: "class",
                    name: class.cap_name(),
                });
            }
            let mut names = BTreeMap::new();
            for function in &class.functions {
                if names.insert(&function.name, ()).is_some() {
                    return Err(GenError::Duplicate {
                        kind: "function",
                        name: class.native_name(function),
                    });
                }
            }
        }

        // the same entry point must mean the same thing in every class declaring it
        let mut seen: BTreeMap<String, ClassFunction> = BTreeMap::new();
        for f in self.functions() {
            if let Some(first) = seen.get(&f.native_name()) {
                if first.function.ret != f.function.ret
                    || first.function.params != f.function.params
                    || first.function.tags.deprecated != f.function.tags.deprecated
                    || first.class.platform() != f.class.platform()
                {
                    return Err(GenError::Conflict {
                        function: f.native_name(),
                        first: first.class.cap_name(),
                        second: f.class.cap_name(),
                    });
                }
            } else {
                seen.insert(f.native_name(), f);
            }

            self.transforms(f)?;
        }

        debug!("{} classes, {} functions validated", self.classes.len(), seen.len());
        Ok(())
    }

    /// Validates the registry, then writes bindings with `generator`. Nothing is written if
    /// validation fails.
    pub fn write_bindings<G, W>(&self, generator: G, output: &mut W) -> Result<(), GenError>
    where
        G: Generator,
        W: io::Write,
    {
        self.validate()?;
        generator.write(self, output)?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn int() -> NativeType { TypeTable::new().parse("GLint").unwrap() }

    #[test]
    fn cap_names() {
        assert_eq!(NativeClass::new("GL11", "GL").cap_name(), "OpenGL11");
        assert_eq!(NativeClass::new("ARB_sync", "GL").cap_name(), "GL_ARB_sync");
        assert_eq!(NativeClass::new("GLX13", "GLX").cap_name(), "GLX13");
        assert_eq!(NativeClass::new("EXT_SOURCE_RADIUS", "AL").cap_name(), "AL_EXT_SOURCE_RADIUS");
    }

    #[test]
    fn platforms_follow_the_method_prefix() {
        let mut glx = NativeClass::new("EXT_swap_control", "GLX");
        glx.prefix_method = "glX".to_owned();
        assert_eq!(glx.platform(), Some(Platform::Linux));
        assert_eq!(NativeClass::new("WGL_ARB_pbuffer", "WGL").platform(), Some(Platform::Windows));
        assert_eq!(NativeClass::new("ARB_sync", "GL").platform(), None);
    }

    #[test]
    fn factors() {
        let f = Factor::parse(">> typeToByteShift(type)").unwrap();
        assert_eq!(f.op, FactorOp::Shr);
        assert_eq!(f.apply("indices.len()"), "(indices.len() >> (typeToByteShift(type)))");
        assert_eq!(Factor::parse("/4").unwrap().op, FactorOp::Div);
        assert!(Factor::parse("4").is_none());
        assert!(Factor::parse("<<").is_none());
    }

    #[test]
    fn depends_on() {
        assert_eq!(DependsOn::parse("GL_ARB_foo"), Some(DependsOn::Extension("GL_ARB_foo".to_owned())));
        let any = DependsOn::parse("GL_ARB_foo | GL_EXT_foo").unwrap();
        assert!(any.satisfied_by(|name| name == "GL_EXT_foo"));
        assert!(!any.satisfied_by(|_| false));
        assert_eq!(DependsOn::parse("  "), None);
    }

    #[test]
    fn platform_bound_classes_need_a_known_prefix() {
        let mut registry = Registry::new("GL", GenConfig::default());
        let mut egl = NativeClass::new("EGL15", "EGL");
        egl.platform_bound = true;
        registry.classes.push(egl);
        assert!(matches!(registry.validate(), Err(GenError::UnrecognizedPrefix { .. })));

        registry.classes[0].prefix_method = "glX".to_owned();
        assert!(registry.validate().is_ok());
    }

    #[test]
    fn shared_functions_must_agree() {
        let mut registry = Registry::new("GL", GenConfig::default());
        let mut gl32 = NativeClass::new("GL32", "GL");
        let pname = vec![Parameter::new("pname", int())];
        gl32.functions.push(FunctionDeclaration::new("GetInteger64v", NativeType::Void, pname));
        let mut sync = NativeClass::new("ARB_sync", "GL");
        let name = vec![Parameter::new("name", int())];
        sync.functions.push(FunctionDeclaration::new("GetInteger64v", NativeType::Void, name));
        registry.classes.push(gl32);
        registry.classes.push(sync);
        assert!(matches!(registry.validate(), Err(GenError::Conflict { .. })));
    }

    #[test]
    fn duplicate_classes_are_rejected() {
        let mut registry = Registry::new("GL", GenConfig::default());
        registry.classes.push(NativeClass::new("ARB_sync", "GL"));
        registry.classes.push(NativeClass::new("ARB_sync", "GL"));
        assert!(matches!(registry.validate(), Err(GenError::Duplicate { kind: "class", .. })));
    }

    #[test]
    fn distinct_functions_are_sorted_by_native_name() {
        let mut registry = Registry::new("GL", GenConfig::default());
        let mut gl11 = NativeClass::new("GL11", "GL");
        for name in &["Flush", "Clear", "Finish"] {
            gl11.functions.push(FunctionDeclaration::new(*name, NativeType::Void, vec![]));
        }
        registry.classes.push(gl11);
        let names: Vec<String> = registry.distinct_functions().iter().map(ClassFunction::native_name).collect();
        assert_eq!(names, vec!["glClear", "glFinish", "glFlush"]);
        assert_eq!(registry.function_index("glFlush"), Some(2));
    }
}
