////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! Capability tables.
//!
//! A [`Capabilities`] value is built once per native context activation from a
//! [`CapabilitySpec`] (usually a static emitted by the bindings generator), a
//! [`FunctionProvider`] and the set of extension names the context claims to support. The
//! extension set is only a hint: a class is reported as available when it is hinted **and**
//! every entry point it needs actually resolved.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    iter::FromIterator,
};

use crate::provider::{FnPtr, FunctionProvider, Platform};

/// A condition on the hint set under which an entry point exists at all.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Dependency<'a> {
    Extension(&'a str),
    AnyOf(&'a [&'a str]),
}

impl<'a> Dependency<'a> {
    pub fn is_satisfied(&self, ext: &ExtensionSet) -> bool {
        match *self {
            Dependency::Extension(name) => ext.contains(name),
            Dependency::AnyOf(names) => names.iter().any(|name| ext.contains(name)),
        }
    }
}

/// One entry point of a class.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FunctionSpec<'a> {
    pub name: &'a str,
    /// Legacy entry point, never exposed by forward compatible contexts.
    pub deprecated: bool,
    /// The class is usable even if this entry point is missing.
    pub ignore_missing: bool,
    /// Only resolved on this platform.
    pub platform: Option<Platform>,
    /// Only resolved, and only required, when the dependency is hinted.
    pub depends_on: Option<Dependency<'a>>,
}

impl<'a> FunctionSpec<'a> {
    pub const fn new(name: &'a str) -> FunctionSpec<'a> {
        FunctionSpec {
            name,
            deprecated: false,
            ignore_missing: false,
            platform: None,
            depends_on: None,
        }
    }

    pub const fn deprecated(self) -> FunctionSpec<'a> { FunctionSpec { deprecated: true, ..self } }

    pub const fn ignore_missing(self) -> FunctionSpec<'a> { FunctionSpec { ignore_missing: true, ..self } }

    pub const fn platform(self, platform: Platform) -> FunctionSpec<'a> {
        FunctionSpec {
            platform: Some(platform),
            ..self
        }
    }

    pub const fn depends_on(self, dependency: Dependency<'a>) -> FunctionSpec<'a> {
        FunctionSpec {
            depends_on: Some(dependency),
            ..self
        }
    }

    fn is_required(&self, ext: &ExtensionSet) -> bool {
        !self.ignore_missing && self.depends_on.map_or(true, |dep| dep.is_satisfied(ext))
    }
}

/// A native class: a core version or an extension.
#[derive(Copy, Clone, Debug)]
pub struct ClassSpec<'a> {
    /// The capability name, as it appears in the hint set (`GL_ARB_sync`, `OpenGL32`, ...).
    pub name: &'a str,
    pub functions: &'a [FunctionSpec<'a>],
}

/// Everything a capability table is built from.
#[derive(Copy, Clone, Debug)]
pub struct CapabilitySpec<'a> {
    /// Used to tag diagnostics, e.g. `GL` or `GLX`.
    pub api: &'a str,
    pub classes: &'a [ClassSpec<'a>],
}

impl<'a> CapabilitySpec<'a> {
    /// Distinct function names over all classes, sorted. This is the order of
    /// [`Capabilities::function`] indices.
    pub fn function_names(&self) -> Vec<&'a str> {
        let names: BTreeMap<&'a str, ()> = self
            .classes
            .iter()
            .flat_map(|class| class.functions.iter())
            .map(|f| (f.name, ()))
            .collect();
        names.into_iter().map(|(name, _)| name).collect()
    }
}

/// The extension names a context reports. Advisory only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtensionSet {
    names: HashSet<String>,
}

impl ExtensionSet {
    pub fn new() -> ExtensionSet { ExtensionSet::default() }

    /// Parses a whitespace separated extension string, as returned by `glGetString(GL_EXTENSIONS)`.
    pub fn parse(extensions: &str) -> ExtensionSet { extensions.split_whitespace().collect() }

    pub fn insert<S: Into<String>>(&mut self, name: S) -> bool { self.names.insert(name.into()) }

    pub fn contains(&self, name: &str) -> bool { self.names.contains(name) }

    pub fn len(&self) -> usize { self.names.len() }

    pub fn is_empty(&self) -> bool { self.names.is_empty() }
}

impl<S: Into<String>> FromIterator<S> for ExtensionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> ExtensionSet {
        ExtensionSet {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassAvailability {
    /// Hinted and every required entry point resolved.
    pub available: bool,
    /// Available including the deprecated entry points of the class.
    pub legacy: bool,
}

/// The capabilities of one native context.
///
/// Never mutated after construction, so it can be shared freely between threads.
#[derive(Clone, Debug)]
pub struct Capabilities {
    api: String,
    forward_compatible: bool,
    functions: Vec<(String, FnPtr)>,
    function_index: HashMap<String, usize>,
    classes: HashMap<String, ClassAvailability>,
    demoted: Vec<String>,
}

impl Capabilities {
    pub fn api(&self) -> &str { &self.api }

    /// When true, deprecated functions are not available.
    pub fn forward_compatible(&self) -> bool { self.forward_compatible }

    /// The entry point at `index` in [`CapabilitySpec::function_names`] order.
    #[inline]
    pub fn function(&self, index: usize) -> FnPtr {
        self.functions.get(index).map_or(FnPtr::NULL, |&(_, ptr)| ptr)
    }

    /// The entry point named `name`, or the sentinel if it was not declared or not resolved.
    pub fn address(&self, name: &str) -> FnPtr {
        self.function_index.get(name).map_or(FnPtr::NULL, |&index| self.functions[index].1)
    }

    pub fn functions(&self) -> impl Iterator<Item = (&str, FnPtr)> {
        self.functions.iter().map(|(name, ptr)| (name.as_str(), *ptr))
    }

    pub fn is_available(&self, class: &str) -> bool { self.availability(class).available }

    pub fn is_legacy_available(&self, class: &str) -> bool { self.availability(class).legacy }

    pub fn availability(&self, class: &str) -> ClassAvailability {
        self.classes.get(class).copied().unwrap_or_default()
    }

    /// Classes that were hinted but had missing entry points.
    pub fn demoted(&self) -> &[String] { &self.demoted }
}

/// Builds a [`Capabilities`] value for a context.
///
/// Equivalent to `CapabilitiesBuilder::new(spec).forward_compatible(fc).build(provider, hints)`.
pub fn build_capabilities<P>(
    provider: &P,
    hints: &ExtensionSet,
    forward_compatible: bool,
    spec: &CapabilitySpec,
) -> Capabilities
where
    P: FunctionProvider + ?Sized,
{
    CapabilitiesBuilder::new(spec)
        .forward_compatible(forward_compatible)
        .build(provider, hints)
}

pub struct CapabilitiesBuilder<'s> {
    spec: &'s CapabilitySpec<'s>,
    forward_compatible: bool,
    platform: Option<Platform>,
}

impl<'s> CapabilitiesBuilder<'s> {
    pub fn new(spec: &'s CapabilitySpec<'s>) -> CapabilitiesBuilder<'s> {
        CapabilitiesBuilder {
            spec,
            forward_compatible: false,
            platform: Platform::current(),
        }
    }

    pub fn forward_compatible(mut self, forward_compatible: bool) -> CapabilitiesBuilder<'s> {
        self.forward_compatible = forward_compatible;
        self
    }

    /// Overrides the platform platform-bound entry points are checked against.
    pub fn platform(mut self, platform: Option<Platform>) -> CapabilitiesBuilder<'s> {
        self.platform = platform;
        self
    }

    pub fn build<P>(&self, provider: &P, hints: &ExtensionSet) -> Capabilities
    where P: FunctionProvider + ?Sized {
        let spec = self.spec;

        // A function declared by several classes is resolved once, when any declaration allows it.
        let mut wanted: BTreeMap<&str, bool> = BTreeMap::new();
        for function in spec.classes.iter().flat_map(|class| class.functions.iter()) {
            let open = self.gate_open(hints, function);
            *wanted.entry(function.name).or_insert(false) |= open;
        }
        let resolved: BTreeMap<&str, FnPtr> = wanted
            .into_iter()
            .map(|(name, wanted)| {
                let ptr = if wanted { FnPtr::new(provider.get_function_address(name)) } else { FnPtr::NULL };
                (name, ptr)
            })
            .collect();

        let mut classes = HashMap::with_capacity(spec.classes.len());
        let mut demoted = Vec::new();
        for class in spec.classes {
            let availability = self.check_class(spec.api, class, hints, &resolved);
            if hints.contains(class.name) && !availability.available {
                demoted.push(class.name.to_owned());
            }
            classes.insert(class.name.to_owned(), availability);
        }

        let functions: Vec<(String, FnPtr)> =
            resolved.into_iter().map(|(name, ptr)| (name.to_owned(), ptr)).collect();
        let function_index = functions.iter().enumerate().map(|(i, (name, _))| (name.clone(), i)).collect();

        debug!(
            "[{}] {} of {} entry points resolved, {} of {} classes available",
            spec.api,
            functions.iter().filter(|(_, ptr)| ptr.is_loaded()).count(),
            functions.len(),
            classes.values().filter(|c: &&ClassAvailability| c.available).count(),
            classes.len()
        );

        Capabilities {
            api: spec.api.to_owned(),
            forward_compatible: self.forward_compatible,
            functions,
            function_index,
            classes,
            demoted,
        }
    }

    /// Whether `function`, as declared by one class, should be resolved for this context.
    fn gate_open(&self, hints: &ExtensionSet, function: &FunctionSpec) -> bool {
        if let Some(platform) = function.platform {
            if self.platform != Some(platform) {
                trace!("{} skipped, only available on {}", function.name, platform);
                return false;
            }
        }
        if let Some(dependency) = function.depends_on {
            if !dependency.is_satisfied(hints) {
                trace!("{} skipped, dependency {:?} not present", function.name, dependency);
                return false;
            }
        }
        !(function.deprecated && self.forward_compatible)
    }

    fn check_class(
        &self,
        api: &str,
        class: &ClassSpec,
        hints: &ExtensionSet,
        resolved: &BTreeMap<&str, FnPtr>,
    ) -> ClassAvailability {
        let hinted = hints.contains(class.name);
        if class.functions.is_empty() {
            return ClassAvailability {
                available: hinted,
                legacy: false,
            };
        }

        // Resolved for another class does not count when this class's own declaration is gated off.
        let is_loaded = |f: &&FunctionSpec| {
            self.gate_open(hints, f) && resolved.get(f.name).map_or(false, |ptr| ptr.is_loaded())
        };

        let mut has_legacy = false;
        let mut missing = Vec::new();
        let mut missing_legacy = Vec::new();
        for function in class.functions.iter().filter(|f| f.is_required(hints)) {
            if function.deprecated {
                has_legacy = true;
                if !is_loaded(&function) {
                    missing_legacy.push(function.name);
                }
            } else if !is_loaded(&function) {
                missing.push(function.name);
            }
        }

        let consistent = missing.is_empty() && (self.forward_compatible || missing_legacy.is_empty());
        let available = hinted && consistent;
        if hinted && !consistent {
            warn!("[{}] {} was reported as available but an entry point is missing.", api, class.name);
            if !self.forward_compatible {
                missing.extend(missing_legacy);
            }
            debug!("[{}] {} is missing: {}", api, class.name, missing.join(", "));
        }

        ClassAvailability {
            available,
            legacy: available && has_legacy && !self.forward_compatible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{os::raw::c_void, ptr};

    fn all(_: &str) -> *const c_void { 1 as *const c_void }

    fn none(_: &str) -> *const c_void { ptr::null() }

    const SYNC: &[FunctionSpec] = &[FunctionSpec::new("glFenceSync"), FunctionSpec::new("glGetInteger64v")];
    const GL32: &[FunctionSpec] =
        &[FunctionSpec::new("glGetInteger64v"), FunctionSpec::new("glDrawElementsBaseVertex")];
    static SPEC: CapabilitySpec = CapabilitySpec {
        api: "GL",
        classes: &[
            ClassSpec {
                name: "OpenGL32",
                functions: GL32,
            },
            ClassSpec {
                name: "GL_ARB_sync",
                functions: SYNC,
            },
        ],
    };

    #[test]
    fn function_names_are_sorted_and_distinct() {
        assert_eq!(SPEC.function_names(), vec!["glDrawElementsBaseVertex", "glFenceSync", "glGetInteger64v"]);
    }

    #[test]
    fn indices_follow_function_names() {
        let caps = build_capabilities(&|name: &str| name.len() as *const c_void, &ExtensionSet::new(), false, &SPEC);
        for (i, name) in SPEC.function_names().into_iter().enumerate() {
            assert_eq!(caps.function(i).as_ptr() as usize, name.len());
            assert_eq!(caps.address(name), caps.function(i));
        }
        assert!(!caps.function(17).is_loaded());
        assert!(!caps.address("glNotDeclared").is_loaded());
    }

    #[test]
    fn unhinted_classes_are_unavailable_but_still_resolved() {
        let caps = build_capabilities(&all, &ExtensionSet::new(), false, &SPEC);
        assert!(!caps.is_available("GL_ARB_sync"));
        assert!(caps.address("glFenceSync").is_loaded());
        assert!(caps.demoted().is_empty());
    }

    #[test]
    fn shared_functions_count_for_every_class() {
        let ext = ExtensionSet::parse("OpenGL32 GL_ARB_sync");
        let caps = build_capabilities(&all, &ext, false, &SPEC);
        assert!(caps.is_available("OpenGL32"));
        assert!(caps.is_available("GL_ARB_sync"));

        let caps = build_capabilities(&none, &ext, false, &SPEC);
        assert!(!caps.is_available("OpenGL32"));
        assert!(!caps.is_available("GL_ARB_sync"));
        assert_eq!(caps.demoted().len(), 2);
    }

    #[test]
    fn platform_bound_functions_are_gated() {
        const GLX: &[FunctionSpec] = &[FunctionSpec::new("glXSwapIntervalEXT").platform(Platform::Linux)];
        static GLX_SPEC: CapabilitySpec = CapabilitySpec {
            api: "GLX",
            classes: &[ClassSpec {
                name: "GLX_EXT_swap_control",
                functions: GLX,
            }],
        };
        let ext = ExtensionSet::parse("GLX_EXT_swap_control");

        let caps = CapabilitiesBuilder::new(&GLX_SPEC).platform(Some(Platform::Windows)).build(&all, &ext);
        assert!(!caps.address("glXSwapIntervalEXT").is_loaded());
        assert!(!caps.is_available("GLX_EXT_swap_control"));

        let caps = CapabilitiesBuilder::new(&GLX_SPEC).platform(Some(Platform::Linux)).build(&all, &ext);
        assert!(caps.is_available("GLX_EXT_swap_control"));
    }

    #[test]
    fn dependent_functions_are_optional_without_their_dependency() {
        const DSA: &[FunctionSpec] = &[
            FunctionSpec::new("glClientAttribDefaultEXT"),
            FunctionSpec::new("glTextureBufferRangeEXT")
                .depends_on(Dependency::Extension("GL_ARB_texture_buffer_range")),
            FunctionSpec::new("glTexturePageCommitmentEXT")
                .depends_on(Dependency::AnyOf(&["GL_ARB_sparse_texture", "GL_EXT_sparse_texture"])),
        ];
        static DSA_SPEC: CapabilitySpec = CapabilitySpec {
            api: "GL",
            classes: &[ClassSpec {
                name: "GL_EXT_direct_state_access",
                functions: DSA,
            }],
        };
        let only = |name: &str| if name == "glClientAttribDefaultEXT" { 4 as *const c_void } else { ptr::null() };

        let caps = build_capabilities(&only, &ExtensionSet::parse("GL_EXT_direct_state_access"), false, &DSA_SPEC);
        assert!(caps.is_available("GL_EXT_direct_state_access"));

        let ext = ExtensionSet::parse("GL_EXT_direct_state_access GL_EXT_sparse_texture");
        let caps = build_capabilities(&only, &ext, false, &DSA_SPEC);
        assert!(!caps.is_available("GL_EXT_direct_state_access"));
        assert_eq!(caps.demoted(), ["GL_EXT_direct_state_access".to_owned()]);
    }

    #[test]
    fn ignore_missing_functions_are_not_required() {
        const DEBUG: &[FunctionSpec] = &[
            FunctionSpec::new("glDebugMessageCallback"),
            FunctionSpec::new("glGetPointerv").ignore_missing(),
        ];
        static DEBUG_SPEC: CapabilitySpec = CapabilitySpec {
            api: "GL",
            classes: &[ClassSpec {
                name: "GL_KHR_debug",
                functions: DEBUG,
            }],
        };
        let only = |name: &str| if name == "glDebugMessageCallback" { 4 as *const c_void } else { ptr::null() };
        let caps = build_capabilities(&only, &ExtensionSet::parse("GL_KHR_debug"), false, &DEBUG_SPEC);
        assert!(caps.is_available("GL_KHR_debug"));
    }

    #[test]
    fn shared_functions_resolve_for_any_open_declaration() {
        const DSA: &[FunctionSpec] =
            &[FunctionSpec::new("glTexBufferRange").depends_on(Dependency::Extension("GL_EXT_direct_state_access"))];
        const GL43: &[FunctionSpec] = &[FunctionSpec::new("glTexBufferRange")];
        static SHARED: CapabilitySpec = CapabilitySpec {
            api: "GL",
            classes: &[
                ClassSpec {
                    name: "GL_EXT_direct_state_access",
                    functions: DSA,
                },
                ClassSpec {
                    name: "OpenGL43",
                    functions: GL43,
                },
            ],
        };
        let caps = build_capabilities(&all, &ExtensionSet::parse("OpenGL43"), false, &SHARED);
        assert!(caps.address("glTexBufferRange").is_loaded());
        assert!(caps.is_available("OpenGL43"));
        assert!(caps.demoted().is_empty());
    }

    #[test]
    fn gated_declarations_do_not_borrow_other_resolutions() {
        const WGL: &[FunctionSpec] = &[FunctionSpec::new("glGetStringi").platform(Platform::Windows)];
        const GL30: &[FunctionSpec] = &[FunctionSpec::new("glGetStringi")];
        static SHARED: CapabilitySpec = CapabilitySpec {
            api: "GL",
            classes: &[
                ClassSpec {
                    name: "WGL_ARB_extensions_string",
                    functions: WGL,
                },
                ClassSpec {
                    name: "OpenGL30",
                    functions: GL30,
                },
            ],
        };
        let caps = CapabilitiesBuilder::new(&SHARED)
            .platform(Some(Platform::Linux))
            .build(&all, &ExtensionSet::parse("OpenGL30 WGL_ARB_extensions_string"));
        assert!(caps.is_available("OpenGL30"));
        assert!(!caps.is_available("WGL_ARB_extensions_string"));
    }

    #[test]
    fn capabilities_are_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Capabilities>();
    }
}
