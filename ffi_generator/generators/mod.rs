////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

use std::{collections::BTreeMap, io};

use crate::registry::{BaseType, Constant, FunctionDeclaration, Registry};

pub mod binding_gen;
pub mod capabilities_gen;

/// Trait for a bindings generator.
pub trait Generator {
    /// Writes the generated code for every declaration in `registry`.
    fn write<W>(&self, registry: &Registry, dest: &mut W) -> io::Result<()>
    where W: io::Write;
}

/// Name of the typed capability struct, e.g. `GLCapabilities`.
pub fn gen_struct_name(registry: &Registry) -> String { format!("{}Capabilities", registry.api) }

/// This function generates a `const name: type = value;` item.
pub fn gen_constant_item<W>(constant: &Constant, types_prefix: &str, dest: &mut W) -> io::Result<()>
where W: io::Write {
    writeln!(
        dest,
        "#[allow(dead_code, non_upper_case_globals)] pub const {ident}: {types_prefix}{ty} = {value};",
        ident = constant.name,
        types_prefix = types_prefix,
        ty = constant.ty,
        value = constant.value,
    )
}

/// Every type name the declarations use, with what it stands for.
pub fn named_types(registry: &Registry) -> BTreeMap<String, BaseType> {
    let mut names = Vec::new();
    for f in registry.functions() {
        f.function.ret.ty.named_types(&mut names);
        for param in &f.function.params {
            param.ty.named_types(&mut names);
            if let Some(array) = &param.tags.pointer_array {
                array.element.named_types(&mut names);
            }
        }
    }
    let mut types: BTreeMap<String, BaseType> = names.into_iter().collect();
    for class in &registry.classes {
        for constant in &class.constants {
            if let Some(base) = registry.types.lookup(&constant.ty) {
                types.insert(constant.ty.clone(), base);
            }
        }
    }
    // the table knows what a name really is, e.g. that a bare `GLchar` is a character
    for (name, base) in types.iter_mut() {
        if let Some(declared) = registry.types.lookup(name) {
            *base = declared;
        }
    }
    types
}

/// Generates all the type aliases of a `types` module.
///
/// Aliases are either `pub type = ...` or opaque `#[repr(C)] pub struct ... { ... }`.
pub fn gen_types<W>(registry: &Registry, dest: &mut W) -> io::Result<()>
where W: io::Write {
    for (name, base) in named_types(registry) {
        match base {
            BaseType::Void => {},
            BaseType::Primitive(prim) => writeln!(dest, "pub type {} = {};", name, prim.rust_name())?,
            BaseType::Char(_) => writeln!(dest, "pub type {} = std::os::raw::c_char;", name)?,
            BaseType::Opaque | BaseType::Callback => {
                writeln!(dest, "pub type {} = *const std::os::raw::c_void;", name)?
            },
            BaseType::Struct => writeln!(dest, "#[repr(C)] pub struct {} {{ _private: [u8; 0] }}", name)?,
        }
    }
    Ok(())
}

/// Generates the list of native `Arg`s of a function.
pub fn gen_parameters(function: &FunctionDeclaration, with_idents: bool, with_types: bool) -> Vec<String> {
    function
        .params
        .iter()
        .map(|param| {
            if with_idents && with_types {
                format!("{}: {}", param.ident(), param.ty.rust_type())
            } else if with_types {
                param.ty.rust_type()
            } else if with_idents {
                param.ident()
            } else {
                unreachable!()
            }
        })
        .collect()
}

/// ` -> T`, or nothing for `()`.
pub fn gen_return_suffix(ty: &str) -> String {
    if ty == "()" {
        String::new()
    } else {
        format!(" -> {}", ty)
    }
}
