////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! Parameter and return transforms.
//!
//! Every native parameter gets exactly one [`ParamTransform`], chosen from its tags. The
//! transform decides how the parameter appears in the public signature, which code prepares
//! its native argument and what is released after the call. A function may additionally get a
//! [`ReturnTransform`] that replaces (or is returned next to) the native return value.
//!
//! Generated bodies are laid out in phases, each phase emitting the pieces of every parameter
//! in declaration order:
//!
//! 1. prelude: sizes and expressions, computed from the public arguments
//! 2. setup: scratch memory and encoding, inside a scratch frame if any transform needs one
//! 3. conversion: pass-through slices to raw pointers
//! 4. the native call, the return expression and cleanup

use std::collections::HashMap;

use crate::{
    config::GenConfig,
    registry::{rust_ident, Capacity, Direction, FunctionDeclaration, NativeClass, NativeType, Parameter},
    scratch::{self, ScratchStrategy},
    Charset, GenError,
};

/// What a pointer array points to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArrayKind {
    /// `const char **`: every string is encoded on its own.
    Strings { charset: Charset, null_terminated: bool },
    /// `const void **`: slices are passed as they are.
    Buffers { element: String },
}

/// Element width of a pointer array's lengths parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LengthWidth {
    Int,
    Size,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamTransform {
    /// Declared with the default type mapping and passed on.
    PassThrough,
    /// Elided, computed from the size of another parameter.
    AutoSize { expression: String, checked: Vec<(String, bool)> },
    /// Elided, computed from the encoded length of a string parameter.
    AutoSizeCharSequence { expression: String },
    /// Replaced by a literal expression. Kept in the signature when `keep` is set.
    Expression { expression: String, keep: bool },
    /// Elided output buffer in a scratch frame.
    StackScratch { element: String, count: String },
    /// Elided output buffer on the heap.
    HeapScratch { element: String, count: String },
    /// Elided length output, consumed by the return transform.
    ReturnLength { element: String },
    PointerArray { kind: ArrayKind, single: Option<String> },
    PointerArrayLengths { array: String, strings: bool, width: LengthWidth },
    StringEncode { charset: Charset, null_terminated: bool, nullable: bool },
    /// A pointer to one value, declared as the value.
    SingleValue { new_name: String, element: String },
    /// A pointer to `size` values, declared as `size` separate arguments.
    VectorValue { new_name: String, element: String, size: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReturnTransform {
    /// Decodes a returned C string.
    String { charset: Charset },
    /// Returns the filled prefix of an output buffer, its length taken from a length output.
    BufferReturn {
        out: String,
        length: String,
        charset: Option<Charset>,
        element: String,
        capacity: String,
    },
    /// Decodes an output string up to its terminator, bounded by the capacity.
    BufferReturnNT { out: String, charset: Charset, capacity: String },
    /// Returns the single value written to an output parameter.
    PrimitiveValue { out: String, element: String },
    /// Wraps a returned pointer as a byte slice of `size` bytes.
    MapPointer { size: String },
}

/// The transforms of one function. `params` lines up with the function's parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionTransforms {
    pub params: Vec<ParamTransform>,
    pub ret: Option<ReturnTransform>,
}

impl FunctionTransforms {
    /// Whether the generated body runs inside a scratch stack frame.
    pub fn needs_frame(&self) -> bool { self.params.iter().any(ParamTransform::needs_frame) }

    /// Scratch strategies of the elided output buffers.
    pub fn strategies(&self) -> Vec<ScratchStrategy> {
        self.params.iter().filter_map(ParamTransform::strategy).collect()
    }
}

fn alloc_failed(cmd: &str) -> String { format!(".expect(\"Failed to allocate scratch memory in {}\")", cmd) }

fn charset_path(charset: Charset) -> String { format!("ffi_runtime::Charset::{:?}", charset) }

/// The slice element and mutability of a pointer that is declared as a slice by default.
fn slice_element(ty: &NativeType) -> Option<(String, bool)> {
    match ty {
        NativeType::Pointer { element, mutable } => match **element {
            NativeType::Void | NativeType::Primitive { .. } | NativeType::Struct(_) => {
                Some((ty.element_rust_type(), *mutable))
            },
            _ => None,
        },
        NativeType::CharSequence { mutable: true, .. } => Some(("u8".to_owned(), true)),
        _ => None,
    }
}

fn optional(ty: String, nullable: bool) -> String {
    if nullable {
        format!("Option<{}>", ty)
    } else {
        ty
    }
}

impl ParamTransform {
    /// Whether the parameter is missing from the public signature.
    pub fn is_elided(&self) -> bool {
        match self {
            ParamTransform::PassThrough
            | ParamTransform::PointerArray { .. }
            | ParamTransform::StringEncode { .. }
            | ParamTransform::SingleValue { .. }
            | ParamTransform::VectorValue { .. } => false,
            ParamTransform::Expression { keep, .. } => !keep,
            _ => true,
        }
    }

    pub fn needs_frame(&self) -> bool {
        match self {
            ParamTransform::StackScratch { .. }
            | ParamTransform::ReturnLength { .. }
            | ParamTransform::PointerArray { .. }
            | ParamTransform::PointerArrayLengths { .. }
            | ParamTransform::StringEncode { .. }
            | ParamTransform::SingleValue { .. }
            | ParamTransform::VectorValue { .. } => true,
            _ => false,
        }
    }

    pub fn strategy(&self) -> Option<ScratchStrategy> {
        match self {
            ParamTransform::StackScratch { .. } => Some(ScratchStrategy::Stack),
            ParamTransform::HeapScratch { .. } => Some(ScratchStrategy::Heap),
            _ => None,
        }
    }

    /// The `name: Type` entries this parameter contributes to the public signature.
    pub fn declaration(&self, param: &Parameter) -> Vec<String> {
        let name = param.ident();
        match self {
            ParamTransform::PassThrough | ParamTransform::Expression { keep: true, .. } => {
                let ty = match slice_element(&param.ty) {
                    Some((element, false)) => optional(format!("&[{}]", element), param.tags.nullable),
                    Some((element, true)) => optional(format!("&mut [{}]", element), param.tags.nullable),
                    None => param.ty.rust_type(),
                };
                vec![format!("{}: {}", name, ty)]
            },
            ParamTransform::PointerArray { kind, single } => {
                let (many, one) = match kind {
                    ArrayKind::Strings { .. } => ("&[&str]".to_owned(), "&str".to_owned()),
                    ArrayKind::Buffers { element } => (format!("&[&[{}]]", element), format!("&[{}]", element)),
                };
                match single {
                    Some(single) => vec![format!("{}: {}", single, one)],
                    None => vec![format!("{}: {}", name, many)],
                }
            },
            ParamTransform::StringEncode { nullable, .. } => {
                vec![format!("{}: {}", name, optional("&str".to_owned(), *nullable))]
            },
            ParamTransform::SingleValue { new_name, element } => vec![format!("{}: {}", new_name, element)],
            ParamTransform::VectorValue { new_name, element, size } => {
                (0..*size).map(|i| format!("{}{}: {}", new_name, i, element)).collect()
            },
            _ => Vec::new(),
        }
    }

    /// Code run before the scratch frame is opened.
    pub fn prelude(&self, param: &Parameter) -> Option<String> {
        let name = param.ident();
        match self {
            ParamTransform::AutoSize { expression, checked } => {
                let mut code = format!("let {}: {} = {};", name, param.ty.rust_type(), expression);
                for (buffer, nullable) in checked {
                    if *nullable {
                        code.push_str(&format!(
                            "\nif let Some({b}) = {b}.as_deref() {{ \
                             ffi_runtime::checks::check_buffer({b}, {n} as usize); }}",
                            b = buffer,
                            n = name
                        ));
                    } else {
                        code.push_str(&format!("\nffi_runtime::checks::check_buffer({}, {} as usize);", buffer, name));
                    }
                }
                Some(code)
            },
            ParamTransform::AutoSizeCharSequence { expression } | ParamTransform::Expression { expression, .. } => {
                Some(format!("let {}: {} = {};", name, param.ty.rust_type(), expression))
            },
            _ => None,
        }
    }

    /// Code run inside the scratch frame, `__frame`, before the call.
    ///
    /// Frame allocations spill to the heap when the frame is full, so only the heap scratch and
    /// 32-bit string lengths can fail, and only for sizes no caller can produce.
    pub fn setup(&self, param: &Parameter, cmd: &str) -> Option<String> {
        let name = param.ident();
        let ty = param.ty.rust_type();
        Some(match self {
            ParamTransform::StackScratch { element, count } => format!(
                "let {n}_scratch = \
                 __frame.zeroed(({c}) * __imports::mem::size_of::<{e}>(), __imports::mem::align_of::<{e}>());\n\
                 let {n} = {n}_scratch.as_mut_ptr::<{e}>() as {t};",
                n = name,
                c = count,
                e = element,
                t = ty
            ),
            ParamTransform::HeapScratch { element, count } => format!(
                "let mut {n}_buffer = ffi_runtime::scratch::HeapBuffer::alloc_for::<{e}>({c}){x};\n\
                 let {n} = {n}_buffer.as_mut_ptr::<{e}>() as {t};",
                n = name,
                c = count,
                e = element,
                x = alloc_failed(cmd),
                t = ty
            ),
            ParamTransform::ReturnLength { element } => format!(
                "let {n}_scratch = \
                 __frame.zeroed(__imports::mem::size_of::<{e}>(), __imports::mem::align_of::<{e}>());\n\
                 let {n} = {n}_scratch.as_mut_ptr::<{e}>() as {t};",
                n = name,
                e = element,
                t = ty
            ),
            ParamTransform::PointerArray {
                kind: ArrayKind::Strings { charset, null_terminated },
                single,
            } => format!(
                "let {n}_strings = ffi_runtime::pointer_array::StringArray::{ctor}({src}, {cs}, {nt});\n\
                 let {n}_pointers = {n}_strings.pointers_in(&__frame);\n\
                 let {n} = {n}_pointers.as_mut_ptr::<u8>() as {t};",
                n = name,
                ctor = if single.is_some() { "single" } else { "encode" },
                src = single.as_ref().unwrap_or(&name),
                cs = charset_path(*charset),
                nt = null_terminated,
                t = ty
            ),
            ParamTransform::PointerArray {
                kind: ArrayKind::Buffers { .. },
                single,
            } => {
                let slices = match single {
                    Some(single) => {
                        format!("let {n}_single = [{s}];\nlet {n}_slices = &{n}_single[..];", n = name, s = single)
                    },
                    None => format!("let {n}_slices = {n};", n = name),
                };
                format!(
                    "{slices}\n\
                     let {n}_pointers = ffi_runtime::pointer_array::buffer_pointers_in(&__frame, {n}_slices);\n\
                     let {n} = {n}_pointers.as_mut_ptr::<u8>() as {t};",
                    slices = slices,
                    n = name,
                    t = ty
                )
            },
            ParamTransform::PointerArrayLengths { array, strings: true, width } => {
                let (f, x) = match width {
                    LengthWidth::Int => (
                        "int_lengths_in",
                        format!(".expect(\"A string passed to {} is too long for a 32-bit length\")", cmd),
                    ),
                    LengthWidth::Size => ("pointer_lengths_in", String::new()),
                };
                format!(
                    "let {n}_lengths = {a}_strings.{f}(&__frame){x};\nlet {n} = {n}_lengths.as_mut_ptr::<u8>() as {t};",
                    n = name,
                    a = array,
                    f = f,
                    x = x,
                    t = ty
                )
            },
            ParamTransform::PointerArrayLengths { array, strings: false, .. } => format!(
                "let {n}_lengths = ffi_runtime::pointer_array::buffer_lengths_in(&__frame, {a}_slices);\n\
                 let {n} = {n}_lengths.as_mut_ptr::<u8>() as {t};",
                n = name,
                a = array,
                t = ty
            ),
            ParamTransform::StringEncode {
                charset,
                null_terminated,
                nullable,
            } => format!(
                "let {n}_encoded = __frame.{f}({n}, {cs}, {nt});\nlet {n} = {n}_encoded.as_ptr::<u8>() as {t};",
                n = name,
                f = if *nullable { "encode_opt" } else { "encode" },
                cs = charset_path(*charset),
                nt = null_terminated,
                t = ty
            ),
            ParamTransform::SingleValue { new_name, .. } => format!(
                "let {n}_value = __frame.copy(&[{v}]);\nlet {n} = {n}_value.as_mut_ptr::<u8>() as {t};",
                n = name,
                v = new_name,
                t = ty
            ),
            ParamTransform::VectorValue { new_name, size, .. } => format!(
                "let {n}_value = __frame.copy(&[{v}]);\nlet {n} = {n}_value.as_mut_ptr::<u8>() as {t};",
                n = name,
                v = (0..*size).map(|i| format!("{}{}", new_name, i)).collect::<Vec<_>>().join(", "),
                t = ty
            ),
            _ => return None,
        })
    }

    /// Default conversion of a pass-through argument to its native type.
    pub fn conversion(&self, param: &Parameter) -> Option<String> {
        match self {
            ParamTransform::PassThrough => {},
            _ => return None,
        }
        let (_, mutable) = slice_element(&param.ty)?;
        let n = param.ident();
        let t = param.ty.rust_type();
        Some(match (mutable, param.tags.nullable) {
            (false, false) => format!("let {n} = {n}.as_ptr() as {t};", n = n, t = t),
            (true, false) => format!("let {n} = {n}.as_mut_ptr() as {t};", n = n, t = t),
            (false, true) => {
                format!("let {n} = {n}.map_or(__imports::ptr::null(), |b| b.as_ptr()) as {t};", n = n, t = t)
            },
            (true, true) => {
                format!("let {n} = {n}.map_or(__imports::ptr::null_mut(), |b| b.as_mut_ptr()) as {t};", n = n, t = t)
            },
        })
    }

    /// Code run after the return value was computed.
    pub fn cleanup(&self, param: &Parameter) -> Option<String> {
        match self {
            ParamTransform::HeapScratch { .. } => Some(format!("drop({}_buffer);", param.ident())),
            ParamTransform::PointerArray {
                kind: ArrayKind::Strings { .. },
                ..
            } => Some(format!("{}_strings.free();", param.ident())),
            _ => None,
        }
    }
}

impl ReturnTransform {
    /// The public type of the transformed value.
    pub fn rust_type(&self) -> String {
        match self {
            ReturnTransform::String { .. } => "Option<String>".to_owned(),
            ReturnTransform::BufferReturn { charset: Some(_), .. } | ReturnTransform::BufferReturnNT { .. } => {
                "String".to_owned()
            },
            ReturnTransform::BufferReturn { element, .. } => format!("Vec<{}>", element),
            ReturnTransform::PrimitiveValue { element, .. } => element.clone(),
            ReturnTransform::MapPointer { .. } => "Option<&'static mut [u8]>".to_owned(),
        }
    }

    /// Whether the transform replaces the native return value rather than being returned next to it.
    pub fn replaces_result(&self) -> bool {
        match self {
            ReturnTransform::String { .. } | ReturnTransform::MapPointer { .. } => true,
            _ => false,
        }
    }

    /// The expression computing the value after the call. The native result is `__result`.
    ///
    /// Strings are decoded leniently: a native function truncating its output may cut a character.
    pub fn expression(&self) -> String {
        match self {
            ReturnTransform::String { charset } => format!(
                "ffi_runtime::codec::decode_ptr_lossy(__result as *const __imports::c_char, {})",
                charset_path(*charset)
            ),
            ReturnTransform::BufferReturn {
                out,
                length,
                charset: Some(charset),
                capacity,
                ..
            } => format!(
                "ffi_runtime::codec::decode_lossy(\
                 std::slice::from_raw_parts({o} as *const u8, (*{l} as usize).min({c}) * {u}), {cs})",
                o = out,
                l = length,
                c = capacity,
                u = charset.unit_size(),
                cs = charset_path(*charset)
            ),
            ReturnTransform::BufferReturn {
                out,
                length,
                element,
                capacity,
                ..
            } => format!(
                "std::slice::from_raw_parts({o} as *const {e}, (*{l} as usize).min({c})).to_vec()",
                o = out,
                e = element,
                l = length,
                c = capacity
            ),
            ReturnTransform::BufferReturnNT { out, charset, capacity } => format!(
                "ffi_runtime::codec::decode_nt_lossy(std::slice::from_raw_parts({o} as *const u8, {c} * {u}), {cs})",
                o = out,
                c = capacity,
                u = charset.unit_size(),
                cs = charset_path(*charset)
            ),
            ReturnTransform::PrimitiveValue { out, .. } => format!("*{}", out),
            ReturnTransform::MapPointer { size } => format!(
                "if __result.is_null() {{ None }} \
                 else {{ Some(std::slice::from_raw_parts_mut(__result as *mut u8, ({}) as usize)) }}",
                size
            ),
        }
    }
}

/// Scaled, narrowed size expression for `target`.
fn size_expression(base: String, target: &Parameter) -> String {
    let scaled = match &target.tags.auto_size.as_ref().and_then(|a| a.factor.as_ref()) {
        Some(factor) => factor.apply(&base),
        None => base,
    };
    match target.ty.primitive() {
        // narrow targets get the exact width, wider ones their declared type
        Some(prim) if prim.bytes() < 4 => format!("({}) as {}", scaled, prim.rust_name()),
        _ => format!("({}) as {}", scaled, target.ty.rust_type()),
    }
}

fn is_integer(ty: &NativeType) -> bool { ty.primitive().map_or(false, |p| p.is_integer()) }

/// Element type and size in bytes of a returned buffer, in characters for strings.
fn out_element(ty: &NativeType) -> Option<(String, usize, Option<Charset>)> {
    match ty {
        NativeType::CharSequence { charset, .. } => {
            let element = match charset.unit_size() {
                1 => "u8",
                _ => "u16",
            };
            Some((element.to_owned(), charset.unit_size(), Some(*charset)))
        },
        NativeType::Pointer { element, .. } => {
            element.primitive().map(|p| (ty.element_rust_type(), p.bytes(), None))
        },
        _ => None,
    }
}

fn is_mutable_pointer(ty: &NativeType) -> bool {
    match ty {
        NativeType::Pointer { mutable, .. } | NativeType::CharSequence { mutable, .. } => *mutable,
        _ => false,
    }
}

/// Rejects tag combinations that cannot be generated, independently of other parameters.
fn check_tags(cmd: &str, param: &Parameter) -> Result<(), GenError> {
    let tags = &param.tags;
    let fail = |reason: &str| Err(GenError::contradiction(cmd, &param.name, reason));

    if tags.auto_size.is_some() {
        if tags.pointer_array.is_some() {
            return fail("auto-size cannot be combined with pointer-array");
        }
        if tags.expression.is_some() {
            return fail("auto-size cannot be combined with expression");
        }
        if !is_integer(&param.ty) {
            return fail("auto-size targets must be integers");
        }
    }
    if tags.single_value.is_some() && tags.vector.is_some() {
        return fail("single-value cannot be combined with vector");
    }
    let pointee_is_void = param.ty.element().map_or(true, NativeType::is_void);
    if (tags.single_value.is_some() || tags.vector.is_some()) && pointee_is_void {
        return fail("single-value and vector need a typed pointer");
    }
    if let Some((_, 0)) = tags.vector {
        return fail("vectors need at least one component");
    }
    if let Some(array) = &tags.pointer_array {
        match param.ty.element() {
            Some(element) if element.is_pointer() => {},
            _ => return fail("pointer-array needs a pointer to pointers"),
        }
        if !array.element.is_pointer() {
            return fail("pointer-array elements must be pointers");
        }
        if tags.returned.is_some() {
            return fail("pointer-array cannot be returned");
        }
    }
    if tags.null_terminated.is_some() {
        let strings = match (&param.ty, &tags.pointer_array) {
            (NativeType::CharSequence { .. }, _) => true,
            (_, Some(array)) => match array.element {
                NativeType::CharSequence { .. } => true,
                _ => false,
            },
            _ => false,
        };
        if !strings {
            return fail("null-terminated only applies to strings");
        }
    }
    if tags.returned.is_some() {
        if !param.ty.is_pointer() {
            return fail("returned needs a pointer");
        }
        if !is_mutable_pointer(&param.ty) {
            return fail("returned needs a mutable pointer");
        }
        if param.direction == Direction::In {
            return fail("returned parameters must be outputs");
        }
    }
    Ok(())
}

/// Selects the transforms of every parameter of `function` and its return transform.
///
/// Precedence, first match wins: auto-size, expression, pointer-array (and its lengths), the
/// returned buffer and its length, single-value, vector, string input, pass-through.
///
/// Names stored in the transforms are Rust identifiers, see [`rust_ident`].
pub fn select_transforms(
    class: &NativeClass,
    function: &FunctionDeclaration,
    config: &GenConfig,
) -> Result<FunctionTransforms, GenError> {
    let cmd = class.native_name(function);

    let mut names = HashMap::new();
    for param in &function.params {
        if names.insert(&param.name[..], ()).is_some() {
            return Err(GenError::Duplicate {
                kind: "parameter",
                name: format!("{}.{}", cmd, param.name),
            });
        }
        check_tags(&cmd, param)?;
    }

    if function.tags.map_pointer.is_some() && !function.ret.ty.is_pointer() {
        return Err(GenError::contradiction(&cmd, "return", "map-pointer needs a pointer return"));
    }

    let returned: Vec<&Parameter> = function.params.iter().filter(|p| p.tags.returned.is_some()).collect();
    if returned.len() > 1 {
        return Err(GenError::contradiction(&cmd, &returned[1].name, "only one parameter can be returned"));
    }

    let mut transforms: Vec<Option<ParamTransform>> = vec![None; function.params.len()];
    let index_of = |name: &str| function.params.iter().position(|p| p.name == name);

    // pointer arrays and the parameters receiving their lengths
    for (i, param) in function.params.iter().enumerate() {
        if param.tags.auto_size.is_some() || param.tags.expression.is_some() {
            continue;
        }
        let array = match &param.tags.pointer_array {
            Some(array) => array,
            None => continue,
        };
        let kind = match &array.element {
            NativeType::CharSequence { charset, .. } => ArrayKind::Strings {
                charset: param.tags.charset.unwrap_or(*charset),
                null_terminated: param.tags.null_terminated.unwrap_or(true),
            },
            element => ArrayKind::Buffers {
                element: element.element_rust_type(),
            },
        };
        if let Some(lengths) = &array.lengths {
            let j = index_of(lengths).ok_or_else(|| GenError::unknown_param(&cmd, &param.name, lengths))?;
            let target = &function.params[j];
            let width = match target.ty.element().and_then(NativeType::primitive) {
                Some(p) if p.is_integer() && p.bytes() == 4 => LengthWidth::Int,
                Some(p) if p.is_integer() && p.bytes() == 8 => LengthWidth::Size,
                _ => {
                    return Err(GenError::contradiction(
                        &cmd,
                        lengths,
                        "pointer-array lengths must point to 4 or 8 byte integers",
                    ))
                },
            };
            let strings = match kind {
                ArrayKind::Strings { .. } => true,
                ArrayKind::Buffers { .. } => false,
            };
            if !strings && width != LengthWidth::Size {
                return Err(GenError::contradiction(&cmd, lengths, "buffer lengths must be pointer-sized"));
            }
            if target.tags.auto_size.is_some() || target.tags.expression.is_some() || transforms[j].is_some() {
                return Err(GenError::contradiction(
                    &cmd,
                    lengths,
                    "already transformed, cannot receive pointer-array lengths",
                ));
            }
            transforms[j] = Some(ParamTransform::PointerArrayLengths {
                array: param.ident(),
                strings,
                width,
            });
        }
        transforms[i] = Some(ParamTransform::PointerArray {
            kind,
            single: array.single_name.as_deref().map(rust_ident),
        });
    }

    // return pairing: the returned buffer, its length output and its capacity are decided together
    let mut ret = None;
    let mut capacity_param = None;
    if let Some(out) = returned.first() {
        let i = index_of(&out.name).unwrap_or_default();
        let tags = out.tags.returned.clone().unwrap_or_default();
        let (element, element_size, charset) = out_element(&out.ty).ok_or_else(|| {
            GenError::contradiction(&cmd, &out.name, "returned buffers must hold primitives or characters")
        })?;
        let charset = charset.map(|c| out.tags.charset.unwrap_or(c));

        let sizer = function
            .params
            .iter()
            .find(|p| p.tags.auto_size.as_ref().map_or(false, |a| a.buffer == out.name));
        let capacity = match (sizer, tags.max_length) {
            (Some(sizer), _) => Some(Capacity::Param(sizer.name.clone())),
            (None, Some(max)) => Some(Capacity::Constant(max)),
            (None, None) => None,
        };

        let count = match &capacity {
            Some(Capacity::Param(name)) => format!("{}.max(0) as usize", rust_ident(name)),
            Some(Capacity::Constant(n)) => n.to_string(),
            None => "1".to_owned(),
        };

        ret = Some(match (&tags.length, charset, &capacity) {
            (Some(length), _, Some(_)) => {
                let j = index_of(length).ok_or_else(|| GenError::unknown_param(&cmd, &out.name, length))?;
                let target = &function.params[j];
                let length_element = match (&target.ty, target.ty.element().and_then(NativeType::primitive)) {
                    (NativeType::Pointer { mutable: true, .. }, Some(p)) if p.is_integer() => {
                        target.ty.element_rust_type()
                    },
                    _ => {
                        return Err(GenError::contradiction(
                            &cmd,
                            length,
                            "returned lengths must be mutable integer pointers",
                        ))
                    },
                };
                if target.tags.auto_size.is_some() || transforms[j].is_some() {
                    return Err(GenError::contradiction(
                        &cmd,
                        length,
                        "already transformed, cannot receive the returned length",
                    ));
                }
                transforms[j] = Some(ParamTransform::ReturnLength { element: length_element });
                ReturnTransform::BufferReturn {
                    out: out.ident(),
                    length: target.ident(),
                    charset,
                    element: element.clone(),
                    capacity: count.clone(),
                }
            },
            (None, Some(charset), Some(_)) if out.tags.null_terminated != Some(false) => {
                ReturnTransform::BufferReturnNT {
                    out: out.ident(),
                    charset,
                    capacity: count.clone(),
                }
            },
            (None, None, None) => ReturnTransform::PrimitiveValue {
                out: out.ident(),
                element: element.clone(),
            },
            (_, _, None) => {
                return Err(GenError::contradiction(
                    &cmd,
                    &out.name,
                    "a returned buffer needs an auto-size parameter or a max-length",
                ))
            },
            (None, _, Some(_)) => {
                return Err(GenError::contradiction(
                    &cmd,
                    &out.name,
                    "a returned buffer needs a length parameter or a terminator",
                ))
            },
        });

        let strategy = match &capacity {
            Some(capacity) => scratch::choose(capacity, element_size, config),
            None => ScratchStrategy::Stack,
        };
        let strategy = if charset.is_some() && config.heap_string_returns {
            ScratchStrategy::Heap
        } else {
            strategy
        };
        trace!("{}: `{}` returned through {:?} scratch", cmd, out.name, strategy);
        transforms[i] = Some(match strategy {
            ScratchStrategy::Stack => ParamTransform::StackScratch { element, count },
            ScratchStrategy::Heap => ParamTransform::HeapScratch { element, count },
        });
        if let Some(sizer) = sizer {
            capacity_param = Some(sizer.name.clone());
        }
    }

    // everything not decided by an array or the return pairing
    for (i, param) in function.params.iter().enumerate() {
        if let Some(expression) = &param.tags.expression {
            if transforms[i].is_some() {
                return Err(GenError::contradiction(
                    &cmd,
                    &param.name,
                    "expression parameters cannot be consumed by another tag",
                ));
            }
            transforms[i] = Some(ParamTransform::Expression {
                expression: expression.0.clone(),
                keep: expression.1,
            });
            continue;
        }
        if param.tags.auto_size.is_some() || transforms[i].is_some() {
            continue;
        }
        transforms[i] = Some(if let Some(new_name) = &param.tags.single_value {
            ParamTransform::SingleValue {
                new_name: rust_ident(new_name),
                element: param.ty.element_rust_type(),
            }
        } else if let Some((new_name, size)) = &param.tags.vector {
            ParamTransform::VectorValue {
                new_name: new_name.clone(),
                element: param.ty.element_rust_type(),
                size: *size,
            }
        } else if let NativeType::CharSequence {
            charset, mutable: false, ..
        } = param.ty
        {
            ParamTransform::StringEncode {
                charset: param.tags.charset.unwrap_or(charset),
                null_terminated: param.tags.null_terminated.unwrap_or(true),
                nullable: param.tags.nullable,
            }
        } else {
            ParamTransform::PassThrough
        });
    }

    // sizes last, they depend on how their buffers are declared
    let mut encoded_lengths = Vec::new();
    for (i, param) in function.params.iter().enumerate() {
        let auto_size = match &param.tags.auto_size {
            Some(auto_size) => auto_size,
            None => continue,
        };
        if capacity_param.as_ref() == Some(&param.name) {
            transforms[i] = Some(ParamTransform::PassThrough);
            continue;
        }

        let j = index_of(&auto_size.buffer)
            .ok_or_else(|| GenError::unknown_param(&cmd, &param.name, &auto_size.buffer))?;
        let buffer = &function.params[j];
        let buffer_ident = buffer.ident();
        if !buffer.ty.is_pointer() {
            return Err(GenError::contradiction(
                &cmd,
                &param.name,
                format!("auto-size references `{}`, which is not a buffer", buffer.name),
            ));
        }

        let mut checked = Vec::new();
        for name in &auto_size.checked {
            let k = index_of(name).ok_or_else(|| GenError::unknown_param(&cmd, &param.name, name))?;
            match (&transforms[k], slice_element(&function.params[k].ty)) {
                (Some(ParamTransform::PassThrough), Some(_)) => {
                    checked.push((rust_ident(name), function.params[k].tags.nullable))
                },
                _ => {
                    return Err(GenError::contradiction(
                        &cmd,
                        &param.name,
                        format!("auto-size can only check slices, `{}` is not one", name),
                    ))
                },
            }
        }

        let transform = match &transforms[j] {
            Some(ParamTransform::StringEncode { charset, nullable, .. }) => {
                let len = match charset.unit_size() {
                    1 => format!("ffi_runtime::codec::encoded_len({{}}, {})", charset_path(*charset)),
                    unit => format!("ffi_runtime::codec::encoded_len({{}}, {}) / {}", charset_path(*charset), unit),
                };
                let base = if *nullable {
                    format!("{}.map_or(0, |s| {})", buffer_ident, len.replace("{}", "s"))
                } else {
                    len.replace("{}", &buffer_ident)
                };
                encoded_lengths.push(j);
                ParamTransform::AutoSizeCharSequence {
                    expression: size_expression(base, param),
                }
            },
            Some(transform) => {
                let base = match transform {
                    ParamTransform::PointerArray { single: Some(_), .. } | ParamTransform::SingleValue { .. } => {
                        "1".to_owned()
                    },
                    ParamTransform::PointerArray { single: None, .. } => format!("{}.len()", buffer_ident),
                    ParamTransform::VectorValue { size, .. } => size.to_string(),
                    ParamTransform::PassThrough if slice_element(&buffer.ty).is_some() => {
                        if buffer.tags.nullable {
                            format!("ffi_runtime::checks::remaining_or_zero({}.as_deref())", buffer_ident)
                        } else {
                            format!("ffi_runtime::checks::remaining({})", buffer_ident)
                        }
                    },
                    _ => {
                        return Err(GenError::contradiction(
                            &cmd,
                            &param.name,
                            format!("auto-size references `{}`, which has no size", buffer.name),
                        ))
                    },
                };
                ParamTransform::AutoSize {
                    expression: size_expression(base, param),
                    checked,
                }
            },
            None => {
                return Err(GenError::contradiction(
                    &cmd,
                    &param.name,
                    format!("auto-size references `{}`, which is itself a size", buffer.name),
                ))
            },
        };
        transforms[i] = Some(transform);
    }

    // without a terminator the native side only learns a string's length from another parameter
    for (i, param) in function.params.iter().enumerate() {
        let unterminated = match &transforms[i] {
            Some(ParamTransform::StringEncode { null_terminated: false, .. }) => !encoded_lengths.contains(&i),
            Some(ParamTransform::PointerArray {
                kind: ArrayKind::Strings { null_terminated: false, .. },
                ..
            }) => param.tags.pointer_array.as_ref().map_or(true, |array| array.lengths.is_none()),
            _ => false,
        };
        if unterminated {
            return Err(GenError::contradiction(
                &cmd,
                &param.name,
                "strings without a terminator need a parameter receiving their length",
            ));
        }
    }

    if let Some(size) = &function.tags.map_pointer {
        if ret.is_some() {
            return Err(GenError::contradiction(
                &cmd,
                "return",
                "map-pointer cannot be combined with a returned parameter",
            ));
        }
        ret = Some(ReturnTransform::MapPointer { size: size.clone() });
    } else if let NativeType::CharSequence { charset, .. } = function.ret.ty {
        if ret.is_some() {
            return Err(GenError::contradiction(
                &cmd,
                "return",
                "a string return cannot be combined with a returned parameter",
            ));
        }
        ret = Some(ReturnTransform::String { charset });
    }

    let params: Vec<ParamTransform> =
        transforms.into_iter().map(|t| t.unwrap_or(ParamTransform::PassThrough)).collect();
    trace!("{}: {:?} -> {:?}", cmd, params, ret);
    Ok(FunctionTransforms { params, ret })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{AutoSize, Factor, ParamTags, PointerArray, Returned, TypeTable};

    fn ty(spelling: &str) -> NativeType { TypeTable::new().parse(spelling).unwrap() }

    fn sized(buffer: &str) -> ParamTags {
        ParamTags {
            auto_size: Some(AutoSize {
                buffer: buffer.to_owned(),
                checked: Vec::new(),
                factor: None,
            }),
            ..ParamTags::default()
        }
    }

    fn select(params: Vec<Parameter>) -> Result<FunctionTransforms, GenError> {
        select_with(params, &GenConfig::default())
    }

    fn select_with(params: Vec<Parameter>, config: &GenConfig) -> Result<FunctionTransforms, GenError> {
        let class = NativeClass::new("GL20", "GL");
        let function = FunctionDeclaration::new("Test", NativeType::Void, params);
        select_transforms(&class, &function, config)
    }

    fn auto_size_expression(t: &ParamTransform) -> &str {
        match t {
            ParamTransform::AutoSize { expression, .. } | ParamTransform::AutoSizeCharSequence { expression } => {
                expression
            },
            other => panic!("not an auto-size: {:?}", other),
        }
    }

    #[test]
    fn nullable_buffers_size_to_zero() {
        let t = select(vec![
            Parameter::new("count", ty("GLsizei")).with_tags(sized("values")),
            Parameter::new("values", ty("const GLfloat *")).with_tags(ParamTags {
                nullable: true,
                ..ParamTags::default()
            }),
        ])
        .unwrap();
        assert_eq!(
            auto_size_expression(&t.params[0]),
            "(ffi_runtime::checks::remaining_or_zero(values.as_deref())) as types::GLsizei"
        );
        assert_eq!(t.params[1], ParamTransform::PassThrough);
        assert_eq!(t.params[1].declaration(&Parameter::new("values", ty("const GLfloat *")).with_tags(ParamTags {
            nullable: true,
            ..ParamTags::default()
        })), vec!["values: Option<&[types::GLfloat]>"]);
    }

    #[test]
    fn narrow_sizes_are_cast_to_their_width() {
        let t = select(vec![
            Parameter::new("count", ty("GLushort")).with_tags(sized("data")),
            Parameter::new("data", ty("const void *")),
        ])
        .unwrap();
        assert_eq!(auto_size_expression(&t.params[0]), "(ffi_runtime::checks::remaining(data)) as u16");

        let t = select(vec![
            Parameter::new("count", ty("GLbyte")).with_tags(sized("data")),
            Parameter::new("data", ty("const void *")),
        ])
        .unwrap();
        assert!(auto_size_expression(&t.params[0]).ends_with("as i8"));
    }

    #[test]
    fn factors_scale_the_size() {
        let mut tags = sized("indices");
        tags.auto_size.as_mut().unwrap().factor = Factor::parse(">> 2");
        let t = select(vec![
            Parameter::new("count", ty("GLsizei")).with_tags(tags),
            Parameter::new("indices", ty("const void *")),
        ])
        .unwrap();
        assert_eq!(
            auto_size_expression(&t.params[0]),
            "((ffi_runtime::checks::remaining(indices) >> (2))) as types::GLsizei"
        );
    }

    #[test]
    fn string_lengths_use_the_encoded_length() {
        let t = select(vec![
            Parameter::new("length", ty("GLsizei")).with_tags(sized("message")),
            Parameter::new("message", ty("const GLchar *")).with_tags(ParamTags {
                null_terminated: Some(false),
                ..ParamTags::default()
            }),
        ])
        .unwrap();
        assert_eq!(
            auto_size_expression(&t.params[0]),
            "(ffi_runtime::codec::encoded_len(message, ffi_runtime::Charset::Utf8)) as types::GLsizei"
        );
        assert_eq!(t.params[1], ParamTransform::StringEncode {
            charset: Charset::Utf8,
            null_terminated: false,
            nullable: false,
        });
    }

    #[test]
    fn returned_strings_pair_with_their_length() {
        let t = select(vec![
            Parameter::new("program", ty("GLuint")),
            Parameter::new("bufSize", ty("GLsizei")).with_tags(sized("infoLog")),
            Parameter::new("length", ty("GLsizei *")).with_direction(Direction::Out),
            Parameter::new("infoLog", ty("GLchar *"))
                .with_direction(Direction::Out)
                .with_tags(ParamTags {
                    returned: Some(Returned {
                        length: Some("length".to_owned()),
                        max_length: None,
                    }),
                    ..ParamTags::default()
                }),
        ])
        .unwrap();

        assert_eq!(t.params[0], ParamTransform::PassThrough);
        // the capacity stays with the caller
        assert_eq!(t.params[1], ParamTransform::PassThrough);
        assert_eq!(t.params[2], ParamTransform::ReturnLength {
            element: "types::GLsizei".to_owned()
        });
        assert_eq!(t.params[3].strategy(), Some(ScratchStrategy::Heap));
        match &t.ret {
            Some(ReturnTransform::BufferReturn { out, length, charset, .. }) => {
                assert_eq!((&out[..], &length[..], *charset), ("infoLog", "length", Some(Charset::Utf8)));
            },
            other => panic!("unexpected return transform {:?}", other),
        }
    }

    #[test]
    fn constant_capacities_stay_on_the_stack() {
        let out = Parameter::new("name", ty("GLchar *")).with_direction(Direction::Out).with_tags(ParamTags {
            returned: Some(Returned {
                length: None,
                max_length: Some(256),
            }),
            ..ParamTags::default()
        });
        let t = select(vec![Parameter::new("index", ty("GLuint")), out.clone()]).unwrap();
        assert_eq!(t.params[1].strategy(), Some(ScratchStrategy::Stack));
        assert!(matches!(t.ret, Some(ReturnTransform::BufferReturnNT { .. })));

        let config = GenConfig::default().stack_scratch_limit(128);
        let t = select_with(vec![Parameter::new("index", ty("GLuint")), out], &config).unwrap();
        assert_eq!(t.params[1].strategy(), Some(ScratchStrategy::Heap));
    }

    #[test]
    fn single_returned_values() {
        let t = select(vec![
            Parameter::new("pname", ty("GLenum")),
            Parameter::new("data", ty("GLint *")).with_direction(Direction::Out).with_tags(ParamTags {
                returned: Some(Returned::default()),
                ..ParamTags::default()
            }),
        ])
        .unwrap();
        assert!(t.params[1].is_elided());
        assert_eq!(t.ret, Some(ReturnTransform::PrimitiveValue {
            out: "data".to_owned(),
            element: "types::GLint".to_owned()
        }));
    }

    #[test]
    fn string_arrays_fill_their_lengths() {
        let string = ty("const GLchar *const *");
        let t = select(vec![
            Parameter::new("shader", ty("GLuint")),
            Parameter::new("count", ty("GLsizei")).with_tags(sized("string")),
            Parameter::new("string", string).with_tags(ParamTags {
                pointer_array: Some(PointerArray {
                    element: ty("const GLchar *"),
                    single_name: None,
                    lengths: Some("length".to_owned()),
                }),
                ..ParamTags::default()
            }),
            Parameter::new("length", ty("const GLint *")),
        ])
        .unwrap();
        assert_eq!(auto_size_expression(&t.params[1]), "(string.len()) as types::GLsizei");
        assert!(matches!(t.params[2], ParamTransform::PointerArray { single: None, .. }));
        assert_eq!(t.params[3], ParamTransform::PointerArrayLengths {
            array: "string".to_owned(),
            strings: true,
            width: LengthWidth::Int,
        });
        assert!(t.params[3].is_elided());
    }

    #[test]
    fn contradictory_tags_are_errors() {
        let mut tags = sized("strings");
        tags.pointer_array = Some(PointerArray {
            element: ty("const GLchar *"),
            single_name: None,
            lengths: None,
        });
        let err = select(vec![Parameter::new("count", ty("GLsizei")).with_tags(tags)]);
        assert!(matches!(err, Err(GenError::ContradictoryTags { .. })));

        let err = select(vec![Parameter::new("v", ty("const GLfloat *")).with_tags(ParamTags {
            single_value: Some("value".to_owned()),
            vector: Some(("value".to_owned(), 3)),
            ..ParamTags::default()
        })]);
        assert!(matches!(err, Err(GenError::ContradictoryTags { .. })));

        let name = Parameter::new("name", ty("GLchar *")).with_direction(Direction::Out);
        let err = select(vec![name.with_tags(ParamTags {
            returned: Some(Returned::default()),
            ..ParamTags::default()
        })]);
        assert!(matches!(err, Err(GenError::ContradictoryTags { .. })));

        let err = select(vec![Parameter::new("x", ty("GLint")).with_tags(ParamTags {
            null_terminated: Some(true),
            ..ParamTags::default()
        })]);
        assert!(matches!(err, Err(GenError::ContradictoryTags { .. })));
    }

    #[test]
    fn auto_size_needs_a_buffer() {
        let err = select(vec![Parameter::new("count", ty("GLsizei")).with_tags(sized("missing"))]);
        assert!(matches!(err, Err(GenError::UnknownParameter { .. })));

        let err = select(vec![
            Parameter::new("count", ty("GLsizei")).with_tags(sized("x")),
            Parameter::new("x", ty("GLint")),
        ]);
        assert!(matches!(err, Err(GenError::ContradictoryTags { .. })));

        let err = select(vec![
            Parameter::new("count", ty("GLfloat")).with_tags(sized("data")),
            Parameter::new("data", ty("const void *")),
        ]);
        assert!(matches!(err, Err(GenError::ContradictoryTags { .. })));
    }

    #[test]
    fn single_values_and_vectors() {
        let t = select(vec![
            Parameter::new("params", ty("const GLint *")).with_tags(ParamTags {
                single_value: Some("param".to_owned()),
                ..ParamTags::default()
            }),
            Parameter::new("v", ty("const GLfloat *")).with_tags(ParamTags {
                vector: Some(("v".to_owned(), 3)),
                ..ParamTags::default()
            }),
        ])
        .unwrap();
        let v = Parameter::new("v", ty("const GLfloat *"));
        assert_eq!(t.params[1].declaration(&v), vec!["v0: types::GLfloat", "v1: types::GLfloat", "v2: types::GLfloat"]);
        assert!(t.needs_frame());
    }

    #[test]
    fn unterminated_strings_need_a_length() {
        let unterminated = ParamTags {
            null_terminated: Some(false),
            ..ParamTags::default()
        };
        let err = select(vec![Parameter::new("message", ty("const GLchar *")).with_tags(unterminated.clone())]);
        assert!(matches!(err, Err(GenError::ContradictoryTags { .. })));

        let mut array = unterminated;
        array.pointer_array = Some(PointerArray {
            element: ty("const GLchar *"),
            single_name: None,
            lengths: None,
        });
        let err = select(vec![
            Parameter::new("count", ty("GLsizei")).with_tags(sized("string")),
            Parameter::new("string", ty("const GLchar *const *")).with_tags(array),
        ]);
        assert!(matches!(err, Err(GenError::ContradictoryTags { .. })));

        let t = select(vec![Parameter::new("message", ty("const GLchar *"))]).unwrap();
        assert!(matches!(t.params[0], ParamTransform::StringEncode { null_terminated: true, .. }));
    }

    #[test]
    fn keywords_are_escaped_in_generated_code() {
        let params = vec![
            Parameter::new("type", ty("GLenum")),
            Parameter::new("count", ty("GLsizei")).with_tags(sized("ref")),
            Parameter::new("ref", ty("const GLint *")),
            Parameter::new("match", ty("const GLchar *")),
        ];
        let t = select(params.clone()).unwrap();
        assert_eq!(t.params[0].declaration(&params[0]), vec!["type_: types::GLenum"]);
        assert_eq!(auto_size_expression(&t.params[1]), "(ffi_runtime::checks::remaining(ref_)) as types::GLsizei");
        assert_eq!(t.params[2].conversion(&params[2]).unwrap(), "let ref_ = ref_.as_ptr() as *const types::GLint;");
        let setup = t.params[3].setup(&params[3], "glTest").unwrap();
        assert!(setup.starts_with("let match__encoded = __frame.encode(match_, ffi_runtime::Charset::Utf8, true);"));
    }

    #[test]
    fn scratch_setup_spills_instead_of_failing() {
        let out = Parameter::new("name", ty("GLchar *")).with_direction(Direction::Out);
        let setup = ParamTransform::StackScratch {
            element: "u8".to_owned(),
            count: "64".to_owned(),
        }
        .setup(&out, "glGetActiveUniformName")
        .unwrap();
        assert_eq!(
            setup,
            "let name_scratch = __frame.zeroed((64) * __imports::mem::size_of::<u8>(), \
             __imports::mem::align_of::<u8>());\nlet name = name_scratch.as_mut_ptr::<u8>() as *mut types::GLchar;"
        );
        assert!(!setup.contains("expect"));
    }

    #[test]
    fn returned_strings_decode_leniently() {
        let expression = ReturnTransform::BufferReturnNT {
            out: "name".to_owned(),
            charset: Charset::Utf8,
            capacity: "64".to_owned(),
        }
        .expression();
        assert_eq!(
            expression,
            "ffi_runtime::codec::decode_nt_lossy(std::slice::from_raw_parts(name as *const u8, 64 * 1), \
             ffi_runtime::Charset::Utf8)"
        );
        let expression = ReturnTransform::String { charset: Charset::Utf8 }.expression();
        assert!(expression.starts_with("ffi_runtime::codec::decode_ptr_lossy("));
    }

    #[test]
    fn duplicate_parameters_are_rejected() {
        let err = select(vec![Parameter::new("x", ty("GLint")), Parameter::new("x", ty("GLint"))]);
        assert!(matches!(err, Err(GenError::Duplicate { kind: "parameter", .. })));
    }
}
