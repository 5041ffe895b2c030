////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

use std::io;

use crate::registry::{DependsOn, NativeClass, Registry};

/// Writes the capability table the runtime builds `Capabilities` from, the function index
/// constants and a typed struct with one flag per class.
#[allow(missing_copy_implementations)]
pub struct CapabilitiesGenerator;

impl super::Generator for CapabilitiesGenerator {
    fn write<W>(&self, registry: &Registry, dest: &mut W) -> io::Result<()>
    where W: io::Write {
        write_spec(registry, dest)?;
        write_indices(registry, dest)?;
        write_struct(registry, dest)?;
        Ok(())
    }
}

/// The `FunctionSpec` constructor chain of every function of `class`.
pub fn gen_function_specs(class: &NativeClass) -> Vec<String> {
    let platform = class.platform();
    class
        .functions
        .iter()
        .map(|function| {
            let mut spec = format!("ffi_runtime::FunctionSpec::new(\"{}\")", class.native_name(function));
            if function.tags.deprecated {
                spec.push_str(".deprecated()");
            }
            if function.tags.ignore_missing {
                spec.push_str(".ignore_missing()");
            }
            if let Some(platform) = platform {
                spec.push_str(&format!(".platform(ffi_runtime::Platform::{:?})", platform));
            }
            match &function.tags.depends_on {
                Some(DependsOn::Extension(name)) => spec.push_str(&format!(
                    ".depends_on(ffi_runtime::Dependency::Extension(\"{}\"))",
                    name
                )),
                Some(DependsOn::AnyOf(names)) => spec.push_str(&format!(
                    ".depends_on(ffi_runtime::Dependency::AnyOf(&[{}]))",
                    names.iter().map(|n| format!("\"{}\"", n)).collect::<Vec<_>>().join(", ")
                )),
                None => {},
            }
            spec
        })
        .collect()
}

/// Creates the `CAPABILITY_SPEC` static.
fn write_spec<W>(registry: &Registry, dest: &mut W) -> io::Result<()>
where W: io::Write {
    writeln!(
        dest,
        "pub static CAPABILITY_SPEC: ffi_runtime::CapabilitySpec<'static> = \
         ffi_runtime::CapabilitySpec {{\n    api: \"{}\",\n    classes: &[",
        registry.api
    )?;
    for class in &registry.classes {
        writeln!(
            dest,
            "        ffi_runtime::ClassSpec {{\n            name: \"{}\",\n            functions: &[",
            class.cap_name()
        )?;
        for spec in gen_function_specs(class) {
            writeln!(dest, "                {},", spec)?;
        }
        writeln!(dest, "            ],\n        }},")?;
    }
    writeln!(dest, "    ],\n}};")
}

/// Creates an `index` module with the position of every function in the capability table.
fn write_indices<W>(registry: &Registry, dest: &mut W) -> io::Result<()>
where W: io::Write {
    writeln!(dest, "\npub mod index {{\n    #![allow(non_upper_case_globals)]")?;
    for (i, f) in registry.distinct_functions().into_iter().enumerate() {
        writeln!(dest, "    pub const {}: usize = {};", f.native_name(), i)?;
    }
    writeln!(dest, "}}")
}

/// Creates the typed capability struct, dereferencing to `ffi_runtime::Capabilities`.
fn write_struct<W>(registry: &Registry, dest: &mut W) -> io::Result<()>
where W: io::Write {
    let name = super::gen_struct_name(registry);
    let classes: Vec<String> = registry.classes.iter().map(NativeClass::cap_name).collect();

    writeln!(dest, "\n#[allow(non_snake_case)]\npub struct {} {{", name)?;
    for class in &classes {
        writeln!(dest, "    pub {}: bool,", class)?;
    }
    writeln!(dest, "    caps: ffi_runtime::Capabilities,\n}}")?;

    writeln!(
        dest,
        "
impl {name} {{
    pub fn new<P>(provider: &P, ext: &ffi_runtime::ExtensionSet, forward_compatible: bool) -> {name}
    where P: ffi_runtime::FunctionProvider + ?Sized {{
        let caps = ffi_runtime::build_capabilities(provider, ext, forward_compatible, &CAPABILITY_SPEC);
        {name} {{",
        name = name
    )?;
    for class in &classes {
        writeln!(dest, "            {c}: caps.is_available(\"{c}\"),", c = class)?;
    }
    writeln!(
        dest,
        "            caps,
        }}
    }}
}}

impl std::ops::Deref for {name} {{
    type Target = ffi_runtime::Capabilities;

    fn deref(&self) -> &ffi_runtime::Capabilities {{ &self.caps }}
}}",
        name = name
    )
}
