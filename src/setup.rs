//! Project setup performed around file materialization: build configurations,
//! source filters, and per-file precompiled-header and IDL build steps.

use console::style;
use tracing::info;

use crate::error::Result;
use crate::project::ProjectHandle;
use crate::symbols::{Symbols, DLL_LINK, OPTIMIZE_PPRO, TLB_NAME, UNICODE};

pub const DEBUG: &str = "Debug";
pub const RELEASE: &str = "Release";

const COMPILER: &str = "VCCLCompilerTool";
const LINKER: &str = "VCLinkerTool";
const RESOURCE_COMPILER: &str = "VCResourceCompilerTool";
const CUSTOM_BUILD: &str = "VCCustomBuildTool";

/// Header every translation unit precompiles through.
pub const PRECOMPILED_HEADER: &str = "std.h";
/// Source file that creates the precompiled header.
pub const PRECOMPILED_SOURCE: &str = "std.cpp";

pub fn add_filters(project: &mut dyn ProjectHandle) -> Result<()> {
    project.add_filter("Source Files", "cpp;idl;rc;def")?;
    project.add_filter("Header Files", "h")?;
    Ok(())
}

/// Create the Debug and Release configurations.
pub fn add_configurations(project: &mut dyn ProjectHandle, symbols: &Symbols) -> Result<()> {
    let unicode = symbols.flag(UNICODE);
    let dll = symbols.flag(DLL_LINK);
    let ppro = symbols.flag(OPTIMIZE_PPRO);

    info!(unicode, dll, ppro, "configuring project");

    let debug = project.configuration(DEBUG);
    debug
        .set("ConfigurationType", "DynamicLibrary")
        .set("IntermediateDirectory", DEBUG)
        .set("OutputDirectory", DEBUG);
    if unicode {
        debug.set("CharacterSet", "Unicode");
    }
    debug
        .tool(COMPILER)
        .set("UsePrecompiledHeader", "UseUsingSpecific")
        .set("PrecompiledHeaderThrough", PRECOMPILED_HEADER)
        .set(
            "RuntimeLibrary",
            if dll {
                "MultiThreadedDebugDLL"
            } else {
                "MultiThreadedDebug"
            },
        )
        .set("PreprocessorDefinitions", "_WINDOWS;_NDEBUG")
        .set("MinimalRebuild", true)
        .set("TreatWChar_tAsBuiltInType", true)
        .set("DebugInformationFormat", "EditAndContinue")
        .set("Optimization", "Disabled")
        .set("BasicRuntimeChecks", "All")
        .set("EnableFunctionLevelLinking", true)
        .set("WarningLevel", 3);
    debug
        .tool(LINKER)
        .set("LinkIncremental", "Yes")
        .set("GenerateDebugInformation", true);
    debug
        .tool(RESOURCE_COMPILER)
        .set("Culture", "EnglishUS")
        .set("PreprocessorDefinitions", "_DEBUG")
        .set("AdditionalIncludeDirectories", "$(IntDir)");

    let release = project.configuration(RELEASE);
    release
        .set("ConfigurationType", "DynamicLibrary")
        .set("IntermediateDirectory", RELEASE)
        .set("OutputDirectory", RELEASE)
        .set("WholeProgramOptimization", true);
    if unicode {
        release.set("CharacterSet", "Unicode");
    }
    release
        .tool(COMPILER)
        .set("UsePrecompiledHeader", "UseUsingSpecific")
        .set("PrecompiledHeaderThrough", PRECOMPILED_HEADER)
        .set(
            "RuntimeLibrary",
            if dll { "MultiThreadedDLL" } else { "MultiThreaded" },
        )
        .set("PreprocessorDefinitions", "_WINDOWS;NDEBUG")
        .set("InlineFunctionExpansion", "OnlyInline")
        .set("MinimalRebuild", false)
        .set("TreatWChar_tAsBuiltInType", true)
        .set("DebugInformationFormat", "Enabled")
        .set("Optimization", "Full")
        .set("StringPooling", true)
        .set("ForceConformanceInForLoopScope", true)
        .set("WarningLevel", 3)
        .set(
            "OptimizeForProcessor",
            if ppro { "PentiumProAndAbove" } else { "Blended" },
        );
    release
        .tool(LINKER)
        .set("GenerateDebugInformation", true)
        .set("LinkIncremental", "No")
        .set("OptimizeForWindows98", false)
        .set("EnableCOMDATFolding", "Folding")
        .set("OptimizeReferences", "References");
    release
        .tool(RESOURCE_COMPILER)
        .set("Culture", "EnglishUS")
        .set("PreprocessorDefinitions", "NDEBUG")
        .set("AdditionalIncludeDirectories", "$(IntDir)");

    Ok(())
}

/// Per-file settings that need the materialized files to be in the project.
///
/// Files missing from the project are skipped with a warning.
pub fn apply_file_settings(project: &mut dyn ProjectHandle, symbols: &Symbols) -> Result<()> {
    if project.contains_file(PRECOMPILED_SOURCE) {
        for config in [DEBUG, RELEASE] {
            project
                .file_configuration(PRECOMPILED_SOURCE, config)?
                .set("UsePrecompiledHeader", "CreateUsingSpecific");
        }
    } else {
        warn_skipped(PRECOMPILED_SOURCE);
    }

    let idl = format!("{}.idl", symbols.project_name());
    if !project.contains_file(&idl) {
        warn_skipped(&idl);
        return Ok(());
    }

    let tlb = symbols.str_value(TLB_NAME)?;
    let outputs = format!("{tlb}.h;{tlb}.tlb");
    for config in [DEBUG, RELEASE] {
        project
            .file_configuration(&idl, config)?
            .use_tool(CUSTOM_BUILD)
            .set("CommandLine", "idl2h $(InputName) $(InputName)")
            .set("Outputs", outputs.as_str());
    }
    Ok(())
}

fn warn_skipped(file: &str) {
    eprintln!(
        "{} {} is not in the manifest; skipping its build settings",
        style("warning:").yellow().bold(),
        style(file).yellow()
    );
}
