////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

use ffi_generator::{BindingGenerator, CapabilitiesGenerator, DebugPrints, GenConfig, Registry};
use std::{env, fs, path::PathBuf};

const MODULES: &[(&str, &str)] = &[("gl_core.xml", "gl_core.rs"), ("gl_shaders.xml", "gl_shaders.rs")];

fn main() {
    let cargodir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let templates = cargodir.join("..").join("ffigen").join("templates");

    #[cfg(feature = "fn_calls_print")]
    let print = DebugPrints::FunctionCalls;
    #[cfg(not(feature = "fn_calls_print"))]
    let print = DebugPrints::None;

    println!("cargo:rerun-if-changed=build.rs");
    for &(template, module) in MODULES {
        let source = templates.join(template);
        println!("cargo:rerun-if-changed={}", source.display());

        let xml = fs::read(&source).expect("Could not read the declaration template");
        let registry = Registry::from_xml(xml.as_slice(), GenConfig::default().debug_prints(print))
            .unwrap_or_else(|e| panic!("{}: {}", template, e));

        let mut bindings = Vec::new();
        registry.write_bindings(BindingGenerator, &mut bindings).expect("Could not generate bindings");
        registry
            .write_bindings(CapabilitiesGenerator, &mut bindings)
            .expect("Could not generate the capability table");

        // the bindings start with inner attributes, so they become a module file instead of an include!
        let dest = cargodir.join("src").join(module);
        if fs::read(&dest).map_or(true, |current| current != bindings) {
            fs::write(&dest, &bindings).expect("Could not write the bindings module");
        }
    }
}
