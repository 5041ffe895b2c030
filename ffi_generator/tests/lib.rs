////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

extern crate ffi_generator;
extern crate ffi_runtime;

use ffi_generator::{
    BindingGenerator, CapabilitiesGenerator, DebugPrints, GenConfig, GenError, Generator, Registry,
};
use ffi_runtime::{CapabilitySpec, ClassSpec, ExtensionSet, FunctionSpec};

const SHADERS: &str = r#"
<registry api="GL">
    <class name="GL20" prefix="GL">
        <enum name="GL_INFO_LOG_LENGTH" value="0x8B84"/>
        <command name="ShaderSource">
            <doc>Replaces the source code of a shader.</doc>
            <param name="shader" type="GLuint"/>
            <param name="count" type="GLsizei" auto-size="string"/>
            <param name="string" type="const GLchar *const *" pointer-array="const GLchar *" lengths="length"/>
            <param name="length" type="const GLint *"/>
        </command>
        <command name="GetProgramInfoLog">
            <param name="program" type="GLuint"/>
            <param name="bufSize" type="GLsizei" auto-size="infoLog"/>
            <param name="length" type="GLsizei *" direction="out"/>
            <param name="infoLog" type="GLchar *" returned="true" return-length="length"/>
        </command>
        <command name="GetAttribLocation">
            <return type="GLint"/>
            <param name="program" type="GLuint"/>
            <param name="name" type="const GLchar *"/>
        </command>
        <command name="Uniform3f">
            <param name="location" type="GLint"/>
            <param name="v" type="const GLfloat *" vector-name="v" vector-size="3"/>
        </command>
        <command name="BufferSubData">
            <param name="target" type="GLenum"/>
            <param name="offset" type="GLintptr"/>
            <param name="size" type="GLsizeiptr" auto-size="data"/>
            <param name="data" type="const void *" nullable="true"/>
        </command>
        <command name="DrawElements">
            <param name="mode" type="GLenum"/>
            <param name="count" type="GLsizei"/>
            <param name="type" type="GLenum"/>
            <param name="indices" type="const void *"/>
        </command>
        <command name="VertexAttrib4Nusv">
            <param name="index" type="GLuint"/>
            <param name="count" type="GLushort" auto-size="v"/>
            <param name="v" type="const GLushort *"/>
        </command>
    </class>
    <class name="GL11" prefix="GL">
        <command name="Begin" deprecated="true">
            <param name="mode" type="GLenum"/>
        </command>
        <command name="GetString">
            <return type="const GLchar *"/>
            <param name="name" type="GLenum"/>
        </command>
    </class>
</registry>"#;

fn registry() -> Registry { Registry::from_xml(SHADERS.as_bytes(), GenConfig::default()).unwrap() }

fn generate<G: Generator>(registry: &Registry, generator: G) -> String {
    let mut out = Vec::new();
    registry.write_bindings(generator, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

/// The generated item starting at `header`, up to the next blank line.
fn item<'a>(code: &'a str, header: &str) -> &'a str {
    let start = code.find(header).unwrap_or_else(|| panic!("{} not generated", header));
    let end = code[start..].find("\n\n").map_or(code.len(), |end| start + end);
    &code[start..end]
}

#[test]
fn returned_lengths_are_elided_and_capacities_kept() {
    let code = generate(&registry(), BindingGenerator);
    let f = item(&code, "pub fn glGetProgramInfoLog(");
    assert!(f.contains(
        "pub fn glGetProgramInfoLog(caps: &ffi_runtime::Capabilities, program: types::GLuint, bufSize: types::GLsizei) \
         -> String"
    ));
    assert!(f.contains("let length_scratch = __frame.zeroed("));
    assert!(f.contains("let length = length_scratch.as_mut_ptr::<types::GLsizei>() as *mut types::GLsizei;"));
    assert!(f.contains("ffi_runtime::scratch::HeapBuffer::alloc_for::<u8>(bufSize.max(0) as usize).expect("));
    assert!(f.contains("ffi_runtime::codec::decode_lossy("));
    assert!(f.contains("drop(infoLog_buffer);"));
    assert!(f.contains("(program, bufSize, length, infoLog)"));
}

#[test]
fn nullable_sizes_short_circuit_to_zero() {
    let code = generate(&registry(), BindingGenerator);
    let f = item(&code, "pub fn glBufferSubData(");
    assert!(f.contains("data: Option<&[u8]>"));
    assert!(f.contains(
        "let size: types::GLsizeiptr = (ffi_runtime::checks::remaining_or_zero(data.as_deref())) as types::GLsizeiptr;"
    ));
    assert!(f.contains(
        "let data = data.map_or(__imports::ptr::null(), |b| b.as_ptr()) as *const __imports::c_void;"
    ));
    // no scratch memory needed
    assert!(!f.contains("with_stack"));
}

#[test]
fn narrow_sizes_are_cast_to_their_width() {
    let code = generate(&registry(), BindingGenerator);
    let f = item(&code, "pub fn glVertexAttrib4Nusv(");
    assert!(f.contains("let count: types::GLushort = (ffi_runtime::checks::remaining(v)) as u16;"));
}

#[test]
fn strings_are_encoded_in_the_call_frame() {
    let code = generate(&registry(), BindingGenerator);
    let f = item(&code, "pub fn glGetAttribLocation(");
    assert!(f.contains("name: &str) -> types::GLint"));
    assert!(f.contains("let name_encoded = __frame.encode(name, ffi_runtime::Charset::Utf8, true);\n"));
    assert!(f.contains("let name = name_encoded.as_ptr::<u8>() as *const types::GLchar;"));

    let f = item(&code, "pub fn glShaderSource(");
    assert!(f.contains("shader: types::GLuint, string: &[&str])"));
    assert!(f.contains("let count: types::GLsizei = (string.len()) as types::GLsizei;"));
    assert!(f.contains("let string_pointers = string_strings.pointers_in(&__frame);"));
    assert!(f.contains("let length_lengths = string_strings.int_lengths_in(&__frame).expect("));
    assert!(f.contains("string_strings.free();"));
    // lengths are read after the strings were encoded
    assert!(f.find("StringArray::encode").unwrap() < f.find("int_lengths_in").unwrap());
}

#[test]
fn returned_strings_are_decoded() {
    let code = generate(&registry(), BindingGenerator);
    let f = item(&code, "pub fn glGetString(");
    assert!(f.contains("-> Option<String>"));
    assert!(f.contains("ffi_runtime::codec::decode_ptr_lossy(__result as *const __imports::c_char"));
    assert!(!f.contains("expect("));
}

#[test]
fn vectors_are_spread_into_arguments() {
    let code = generate(&registry(), BindingGenerator);
    let f = item(&code, "pub fn glUniform3f(");
    assert!(f.contains("location: types::GLint, v0: types::GLfloat, v1: types::GLfloat, v2: types::GLfloat)"));
    assert!(f.contains("let v_value = __frame.copy(&[v0, v1, v2]);"));
}

#[test]
fn keyword_parameters_are_escaped() {
    let code = generate(&registry(), BindingGenerator);
    let f = item(&code, "pub fn glDrawElements(");
    assert!(f.contains("count: types::GLsizei, type_: types::GLenum, indices: &[u8])"));
    assert!(f.contains("fn(types::GLenum, types::GLsizei, types::GLenum, *const __imports::c_void)"));
    assert!(f.contains("(mode, count, type_, indices);"));
    assert!(!f.contains(" type:"));

    let mut registry = registry();
    registry.config = GenConfig::default().debug_prints(DebugPrints::FunctionCalls);
    let code = generate(&registry, BindingGenerator);
    let f = item(&code, "pub fn glDrawElements(");
    assert!(f.contains("format!(\"glDrawElements({:?}, {:?}, {:?}, {:?})\", mode, count, type_, indices);"));
}

#[test]
fn types_and_constants_are_declared() {
    let code = generate(&registry(), BindingGenerator);
    assert!(code.contains("pub type GLchar = std::os::raw::c_char;"));
    assert!(code.contains("pub type GLushort = u16;"));
    assert!(code.contains("pub const GL_INFO_LOG_LENGTH: types::GLenum = 0x8B84;"));
}

#[test]
fn function_calls_can_be_printed() {
    let mut registry = registry();
    registry.config = GenConfig::default().debug_prints(DebugPrints::FunctionCalls);
    let code = generate(&registry, BindingGenerator);
    let f = item(&code, "pub fn glBegin(");
    assert!(f.contains("let __debug_string = format!(\"glBegin({:?})\", mode);"));
    assert!(f.contains("println!(\"{}\", __debug_string);"));
}

#[test]
fn generation_errors_write_nothing() {
    let xml = r#"<registry api="GL"><class name="GL11" prefix="GL">
        <command name="Clear"><param name="mask" type="GLbitfield"/></command>
        <command name="Broken">
            <param name="count" type="GLsizei" auto-size="names" pointer-array="const GLchar *"/>
        </command>
    </class></registry>"#;
    let registry = Registry::from_xml(xml.as_bytes(), GenConfig::default()).unwrap();
    let mut out = Vec::new();
    let err = registry.write_bindings(BindingGenerator, &mut out);
    assert!(matches!(err, Err(GenError::ContradictoryTags { .. })));
    assert!(out.is_empty());
}

#[test]
fn capability_table_matches_binding_indices() {
    let registry = registry();
    let code = generate(&registry, CapabilitiesGenerator);
    assert!(code.contains("ffi_runtime::FunctionSpec::new(\"glBegin\").deprecated(),"));
    assert!(code.contains("name: \"OpenGL20\","));
    assert!(code.contains("pub OpenGL11: bool,"));

    // the runtime orders its table like the generator numbers the functions
    let classes: Vec<(String, Vec<String>)> = registry
        .classes
        .iter()
        .map(|class| (class.cap_name(), class.functions.iter().map(|f| class.native_name(f)).collect()))
        .collect();
    let functions: Vec<Vec<FunctionSpec>> =
        classes.iter().map(|(_, names)| names.iter().map(|n| FunctionSpec::new(n)).collect()).collect();
    let class_specs: Vec<ClassSpec> = classes
        .iter()
        .zip(functions.iter())
        .map(|((name, _), functions)| ClassSpec { name, functions })
        .collect();
    let spec = CapabilitySpec {
        api: &registry.api,
        classes: &class_specs,
    };
    for (i, name) in spec.function_names().into_iter().enumerate() {
        assert_eq!(registry.function_index(name), Some(i));
        assert!(code.contains(&format!("pub const {}: usize = {};", name, i)));
    }

    let provider = |_: &str| 0x10 as *const std::os::raw::c_void;
    let caps = ffi_runtime::build_capabilities(&provider, &ExtensionSet::parse("OpenGL11"), true, &spec);
    assert!(caps.is_available("OpenGL11"));
    assert!(!caps.is_available("OpenGL20"));
}
