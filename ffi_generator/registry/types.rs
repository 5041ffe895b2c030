////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

use std::{collections::HashMap, fmt};

use lazy_static::lazy_static;

use crate::{Charset, GenError};

/// Native scalar types, by width and signedness.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Bool,
    ISize,
    USize,
}

impl Primitive {
    /// Size in bytes. Pointer-sized integers count as 8.
    pub fn bytes(self) -> usize {
        use self::Primitive::*;
        match self {
            I8 | U8 | Bool => 1,
            I16 | U16 => 2,
            I32 | U32 | F32 => 4,
            I64 | U64 | F64 | ISize | USize => 8,
        }
    }

    pub fn is_integer(self) -> bool {
        match self {
            Primitive::F32 | Primitive::F64 | Primitive::Bool => false,
            _ => true,
        }
    }

    pub fn rust_name(self) -> &'static str {
        use self::Primitive::*;
        match self {
            I8 => "i8",
            U8 => "u8",
            I16 => "i16",
            U16 => "u16",
            I32 => "i32",
            U32 => "u32",
            I64 => "i64",
            U64 => "u64",
            F32 => "f32",
            F64 => "f64",
            Bool => "u8",
            ISize => "isize",
            USize => "usize",
        }
    }

    pub fn from_rust_name(name: &str) -> Option<Primitive> {
        use self::Primitive::*;
        Some(match name {
            "i8" => I8,
            "u8" => U8,
            "i16" => I16,
            "u16" => U16,
            "i32" => I32,
            "u32" => U32,
            "i64" => I64,
            "u64" => U64,
            "f32" => F32,
            "f64" => F64,
            "bool" => Bool,
            "isize" => ISize,
            "usize" => USize,
            _ => return None,
        })
    }
}

/// What a type name stands for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BaseType {
    Void,
    Primitive(Primitive),
    Char(Charset),
    Opaque,
    Struct,
    Callback,
}

lazy_static! {
    // Khronos, C and the other common typedefs templates use without declaring them.
    static ref BUILTIN_TYPES: HashMap<&'static str, BaseType> = {
        use self::BaseType::*;
        use self::Primitive::*;

        let mut map = HashMap::new();
        map.insert("void", Void);
        map.insert("GLvoid", Void);
        map.insert("ALvoid", Void);

        for &(name, prim) in &[
            ("GLenum", U32), ("GLboolean", Bool), ("GLbitfield", U32), ("GLbyte", I8), ("GLshort", I16),
            ("GLint", I32), ("GLsizei", I32), ("GLubyte", U8), ("GLushort", U16), ("GLuint", U32),
            ("GLhalf", U16), ("GLfloat", F32), ("GLclampf", F32), ("GLdouble", F64), ("GLclampd", F64),
            ("GLfixed", I32), ("GLintptr", ISize), ("GLsizeiptr", ISize), ("GLint64", I64), ("GLuint64", U64),
            ("GLint64EXT", I64), ("GLuint64EXT", U64),
            ("ALenum", I32), ("ALboolean", Bool), ("ALbyte", I8), ("ALubyte", U8), ("ALshort", I16),
            ("ALushort", U16), ("ALint", I32), ("ALuint", U32), ("ALsizei", I32), ("ALfloat", F32),
            ("ALdouble", F64), ("ALCenum", I32), ("ALCint", I32), ("ALCuint", U32), ("ALCsizei", I32),
            ("ALCboolean", Bool),
            ("cl_char", I8), ("cl_uchar", U8), ("cl_short", I16), ("cl_ushort", U16), ("cl_int", I32),
            ("cl_uint", U32), ("cl_long", I64), ("cl_ulong", U64), ("cl_float", F32), ("cl_double", F64),
            ("cl_bool", U32), ("cl_bitfield", U64),
            ("int8_t", I8), ("uint8_t", U8), ("int16_t", I16), ("uint16_t", U16), ("int32_t", I32),
            ("uint32_t", U32), ("int64_t", I64), ("uint64_t", U64), ("int", I32), ("unsigned int", U32),
            ("float", F32), ("double", F64), ("size_t", USize), ("ptrdiff_t", ISize), ("intptr_t", ISize),
            ("uintptr_t", USize), ("bool", Bool),
        ] {
            map.insert(name, Primitive(prim));
        }

        map.insert("GLchar", Char(Charset::Utf8));
        map.insert("GLcharARB", Char(Charset::Ascii));
        map.insert("ALchar", Char(Charset::Ascii));
        map.insert("ALCchar", Char(Charset::Ascii));
        map.insert("char", Char(Charset::Utf8));
        map.insert("wchar_t", Char(Charset::Utf16));

        map.insert("GLsync", Opaque);
        map.insert("GLeglImageOES", Opaque);
        map.insert("cl_context", Opaque);
        map.insert("cl_device_id", Opaque);
        map.insert("cl_mem", Opaque);
        map.insert("GLDEBUGPROC", Callback);
        map
    };
}

/// A parsed native type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NativeType {
    Void,
    Primitive { name: String, prim: Primitive },
    /// A data pointer. `mutable` is false when the pointee is `const`.
    Pointer { element: Box<NativeType>, mutable: bool },
    Opaque(String),
    Struct(String),
    Callback(String),
    /// A pointer to characters, i.e. a string.
    CharSequence { name: String, charset: Charset, mutable: bool },
}

impl NativeType {
    pub fn is_void(&self) -> bool {
        match self {
            NativeType::Void => true,
            _ => false,
        }
    }

    pub fn is_pointer(&self) -> bool {
        match self {
            NativeType::Pointer { .. } | NativeType::CharSequence { .. } => true,
            _ => false,
        }
    }

    pub fn primitive(&self) -> Option<Primitive> {
        match self {
            NativeType::Primitive { prim, .. } => Some(*prim),
            _ => None,
        }
    }

    /// The pointee of a data pointer.
    pub fn element(&self) -> Option<&NativeType> {
        match self {
            NativeType::Pointer { element, .. } => Some(element),
            _ => None,
        }
    }

    /// The Rust spelling used in the raw `extern "system" fn` signature.
    pub fn rust_type(&self) -> String {
        match self {
            NativeType::Void => "()".to_owned(),
            NativeType::Primitive { name, .. }
            | NativeType::Opaque(name)
            | NativeType::Struct(name)
            | NativeType::Callback(name) => {
                format!("types::{}", name)
            },
            NativeType::Pointer { element, mutable } => {
                let element = match **element {
                    NativeType::Void => "__imports::c_void".to_owned(),
                    ref other => other.rust_type(),
                };
                format!("*{} {}", if *mutable { "mut" } else { "const" }, element)
            },
            NativeType::CharSequence { name, mutable, .. } => {
                format!("*{} types::{}", if *mutable { "mut" } else { "const" }, name)
            },
        }
    }

    /// The Rust type of one pointee element; bytes for `void` and characters.
    pub fn element_rust_type(&self) -> String {
        match self {
            NativeType::Pointer { element, .. } => match **element {
                NativeType::Void => "u8".to_owned(),
                ref other => other.rust_type(),
            },
            NativeType::CharSequence { .. } => "u8".to_owned(),
            other => other.rust_type(),
        }
    }

    /// Every named type this type refers to, with what it stands for.
    pub fn named_types(&self, out: &mut Vec<(String, BaseType)>) {
        match self {
            NativeType::Void => {},
            NativeType::Primitive { name, prim } => out.push((name.clone(), BaseType::Primitive(*prim))),
            NativeType::Opaque(name) => out.push((name.clone(), BaseType::Opaque)),
            NativeType::Struct(name) => out.push((name.clone(), BaseType::Struct)),
            NativeType::Callback(name) => out.push((name.clone(), BaseType::Callback)),
            NativeType::CharSequence { name, charset, .. } => out.push((name.clone(), BaseType::Char(*charset))),
            NativeType::Pointer { element, .. } => element.named_types(out),
        }
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { f.write_str(&self.rust_type()) }
}

/// Resolves type names to [`BaseType`]s: template declarations first, then the built-in table.
#[derive(Clone, Debug, Default)]
pub struct TypeTable {
    declared: HashMap<String, BaseType>,
}

impl TypeTable {
    pub fn new() -> TypeTable { TypeTable::default() }

    pub fn declare<S: Into<String>>(&mut self, name: S, base: BaseType) { self.declared.insert(name.into(), base); }

    pub fn lookup(&self, name: &str) -> Option<BaseType> {
        self.declared.get(name).or_else(|| BUILTIN_TYPES.get(name)).copied()
    }

    /// Parses a C type spelling such as `const GLchar *const *` or `GLuint *`.
    pub fn parse(&self, spelling: &str) -> Result<NativeType, GenError> {
        let spaced = spelling.replace('*', " * ");
        let mut tokens = spaced.split_whitespace().peekable();

        let mut is_const = false;
        let mut words = Vec::new();
        while let Some(&token) = tokens.peek() {
            match token {
                "*" => break,
                "const" => is_const = true,
                "struct" => {},
                word => words.push(word),
            }
            tokens.next();
        }
        if words.is_empty() {
            return Err(GenError::UnknownType(spelling.to_owned()));
        }
        let name = words.join(" ");
        let base = self.lookup(&name).ok_or_else(|| GenError::UnknownType(name.clone()))?;

        let mut ty = match base {
            BaseType::Void => NativeType::Void,
            BaseType::Primitive(prim) => NativeType::Primitive { name: name.clone(), prim },
            BaseType::Char(_) => NativeType::Primitive {
                name: name.clone(),
                prim: Primitive::I8,
            },
            BaseType::Opaque => NativeType::Opaque(name.clone()),
            BaseType::Struct => NativeType::Struct(name.clone()),
            BaseType::Callback => NativeType::Callback(name.clone()),
        };

        let mut first = true;
        while let Some(token) = tokens.next() {
            match token {
                "*" => {
                    ty = match (first, base) {
                        (true, BaseType::Char(charset)) => NativeType::CharSequence {
                            name: name.clone(),
                            charset,
                            mutable: !is_const,
                        },
                        _ => NativeType::Pointer {
                            element: Box::new(ty),
                            mutable: !is_const,
                        },
                    };
                    first = false;
                    is_const = false;
                },
                "const" => is_const = true,
                other => return Err(GenError::UnknownType(format!("{} (unexpected `{}`)", spelling, other))),
            }
        }

        Ok(ty)
    }
}
