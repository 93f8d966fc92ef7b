use std::ffi::OsString;
use std::path::PathBuf;

use crate::encode_request::EncodeRequest;
use crate::planner::BitratePlan;
use super::pass_plan::{PassDescriptor, os};

pub mod constrained;
pub mod single_shot;
pub mod two_pass;

pub struct PassContext<'a> {
    pub request: &'a EncodeRequest,
    pub plan: &'a BitratePlan,
    pub passlog: PathBuf,
    pub null_sink: PathBuf,
}

pub trait PassFactory {
    /// Ordered passes; index/total are filled in by the builder.
    fn passes(&self, context: &PassContext) -> Vec<PassDescriptor>;
}

/// Arguments every pass starts with: input, scaling and video rate.
pub(crate) fn common_parameters(context: &PassContext) -> Vec<OsString> {
    let request = context.request;
    let mut params = vec![
        os("-y"), os("-hide_banner"),
        os("-i"), os(&request.input),
    ];

    if let Some(filter) = request.resolution.scale_filter() {
        params.push(os("-vf"));
        params.push(os(filter));
    }

    params.push(os("-c:v")); params.push(os(request.codec.cv_parameter()));
    params.push(os("-b:v")); params.push(os(format!("{}k", context.plan.video_kbps)));
    params
}

/// Audio handling, muxer flags and the real output path for a final pass.
pub(crate) fn output_parameters(context: &PassContext) -> Vec<OsString> {
    let request = context.request;
    let mut params: Vec<OsString> = request.audio.parameters().iter().map(os).collect();
    params.extend(request.container.parameters().iter().map(os));
    params.push(os(&request.output));
    params
}

pub(crate) fn passlog_parameters(context: &PassContext, pass: u8) -> Vec<OsString> {
    vec![
        os("-pass"), os(pass.to_string()),
        os("-passlogfile"), os(&context.passlog),
    ]
}
