use crate::ffmpeg::pass_plan::{PassDescriptor, PassSink, os};
use super::{PassContext, PassFactory, common_parameters, output_parameters};

/// SVT-AV1 has no usable two-pass mode through ffmpeg; the target rate goes
/// straight into the encoder parameters.
pub struct SingleShotPassFactory {
}

impl PassFactory for SingleShotPassFactory {
    fn passes(&self, context: &PassContext) -> Vec<PassDescriptor> {
        let mut args = common_parameters(context);
        args.extend([
            os("-preset"), os(context.request.preset.svtav1_preset().to_string()),
            os("-svtav1-params"), os(format!("tbr={}", context.plan.video_kbps)),
        ]);
        args.extend(output_parameters(context));

        vec![PassDescriptor {
            index: 1,
            total: 1,
            args,
            sink: PassSink::Output(context.request.output.clone()),
            sidecars: vec![],
        }]
    }
}
