use crate::ffmpeg::pass_plan::{PassDescriptor, PassSink, os, passlog_sidecars};
use super::{PassContext, PassFactory, common_parameters, output_parameters, passlog_parameters};

/// x264/x265: analysis pass without audio into the null muxer, then the
/// real encode reading the pass log.
pub struct TwoPassFactory {
}

impl PassFactory for TwoPassFactory {
    fn passes(&self, context: &PassContext) -> Vec<PassDescriptor> {
        let preset = [os("-preset"), os(context.request.preset.label())];

        let mut analysis = common_parameters(context);
        analysis.extend(preset.iter().cloned());
        analysis.extend(passlog_parameters(context, 1));
        analysis.extend([os("-an"), os("-f"), os("null"), os(&context.null_sink)]);

        let mut encode = common_parameters(context);
        encode.extend(preset.iter().cloned());
        encode.extend(passlog_parameters(context, 2));
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
