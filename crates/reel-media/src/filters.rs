//! FFmpeg filter graph building.

use reel_models::ScriptStyle;

use crate::render::RenderConfig;

/// Loudness normalization applied to every rendered clip.
/// -14 LUFS integrated is the usual short-form target.
pub const LOUDNORM_FILTER: &str = "loudnorm=I=-14:TP=-1.5:LRA=11";

/// Build the filter complex for landscape-in-portrait with a blurred
/// background.
///
/// The source is zoomed, cropped to the output frame and blurred for the
/// backdrop, then overlaid with a centered lanczos-scaled copy of itself.
/// The graph ends in a `[vout]` label.
pub fn build_vertical_filter(config: &RenderConfig, src_width: u32, src_height: u32) -> String {
    let (main_width, main_height) = config.calculate_main_dimensions(src_width, src_height);
    let y_offset = config.calculate_y_offset(main_height);

    format!(
        "[0:v]scale=iw*{zoom}:ih*{zoom},\
         crop={ow}:{oh}:(iw-{ow})/2:(ih-{oh})/2,\
         gblur=sigma={blur},\
         format=yuv420p[bg];\
         [0:v]scale={mw}:{mh}:flags=lanczos,\
         format=yuv420p[main];\
         [bg][main]overlay=(W-w)/2:{y_offset}:format=auto[vout]",
        zoom = config.background_zoom,
        ow = config.output_width,
        oh = config.output_height,
        blur = config.background_blur,
        mw = main_width,
        mh = main_height,
        y_offset = y_offset,
    )
}

/// Build the drawtext chain for script slides, one timed window per line.
///
/// Line `i` is visible during `[i*per_line_secs, (i+1)*per_line_secs - 0.2)`,
/// leaving a gap before the next slide. The chain consumes `[0:v]` and ends
/// in `[vout]`.
pub fn build_slide_filter(lines: &[String], per_line_secs: f64, style: ScriptStyle) -> String {
    let font_color = match style {
        ScriptStyle::Dark => "white",
        ScriptStyle::Light => "black",
    };

    let draws: Vec<String> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let start = i as f64 * per_line_secs;
            let end = (i as f64 + 1.0) * per_line_secs - 0.2;
            format!(
                "drawtext=text='{text}':fontcolor={color}:fontsize=56:\
                 borderw=2:bordercolor=black@0.6:\
                 x=(w-text_w)/2:y=(h-text_h)/2:\
                 enable='between(t,{start:.3},{end:.3})'",
                text = escape_drawtext(line),
                color = font_color,
                start = start,
                end = end,
            )
        })
        .collect();

    format!("[0:v]{}[vout]", draws.join(","))
}

/// Background color for a script style, as an FFmpeg color source spec.
pub fn slide_background(style: ScriptStyle) -> &'static str {
    match style {
        ScriptStyle::Dark => "0x101018",
        ScriptStyle::Light => "0xf5f2e8",
    }
}

/// Escape text for use inside a single-quoted drawtext argument.
pub fn escape_drawtext(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\'', "\\\\\\'")
        .replace(':', "\\:")
        .replace('%', "\\%")
}
