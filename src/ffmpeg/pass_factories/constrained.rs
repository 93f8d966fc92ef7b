use crate::ffmpeg::pass_plan::{PassDescriptor, PassSink, os, passlog_sidecars};
use super::{PassContext, PassFactory, common_parameters, output_parameters, passlog_parameters};

const ANALYSIS_SPEED: u8 = 4;
const ENCODE_SPEED: u8 = 2;

/// libvpx-vp9: same two-pass shape, but the analysis pass runs at a faster
/// speed and muxes into the target container before being discarded.
pub struct ConstrainedPassFactory {
}

impl PassFactory for ConstrainedPassFactory {
    fn passes(&self, context: &PassContext) -> Vec<PassDescriptor> {
        let mut analysis = common_parameters(context);
        analysis.extend(passlog_parameters(context, 1));
        analysis.extend([
            os("-speed"), os(ANALYSIS_SPEED.to_string()),
            os("-an"),
            os("-f"), os(context.request.container.to_string()),
            os(&context.null_sink),
        ]);

        let mut encode = common_parameters(context);
        encode.extend(passlog_parameters(context, 2));
        encode.extend([os("-speed"), os(ENCODE_SPEED.to_string())]);
        encode.extend(output_parameters(context));

        vec![
            PassDescriptor {
                index: 1,
                total: 2,
                args: analysis,
                sink: PassSink::Discard(context.null_sink.clone()),
                sidecars: passlog_sidecars(&context.passlog),
            },
            PassDescriptor {
                index: 2,
                total: 2,
                args: encode,
                sink: PassSink::Output(context.request.output.clone()),
                sidecars: vec![],
            },
        ]
    }
}
