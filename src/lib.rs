//! Core library for the netbuild command line application.
//!
//! A workbook describing devices, VLANs, VRFs, interfaces, routes,
//! prefix-lists and reusable templates is turned into one configuration
//! script per device. Workbook and file adapters live under
//! [`netbuild::tools::io`], record handling in [`netbuild::tools::ingest`],
//! the network model and its builders in [`netbuild::tools::model`] and
//! [`netbuild::tools::build`], and the end-to-end orchestration in
//! [`netbuild::tools::pipeline`].

pub mod netbuild;

pub use netbuild::tools::{
    Result, ToolError, build, diagnostics, error, ingest, io, model, net, pipeline, render,
    report, validate,
};
