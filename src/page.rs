//! Page composition and 2D rendering: the hero copy, feature cards, footer,
//! the contact modal, the exit overlay and the error panel.
//!
//! Composition is a pure function from a [`PageView`] snapshot to a [`Scene`]
//! of solid panels and text runs, so layout and reveal behavior are testable
//! without a GPU. The [`PageRenderer`] then draws a scene with a small solid
//! pipeline plus `wgpu_glyph` for text.

use lyon::math::{point, Box2D};
use lyon::path::builder::BorderRadii;
use lyon::path::{Path, Winding};
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, VertexBuffers,
};
use tracing::warn;
use wgpu::util::DeviceExt;
use wgpu_glyph::ab_glyph::FontArc;
use wgpu_glyph::{GlyphBrush, GlyphBrushBuilder, HorizontalAlign, Layout, Section, Text};

use crate::boundary::ErrorPanel;
use crate::config::{parse_hex_color, srgb_to_linear, ThemeConfig};
use crate::contact::{ContactForm, Field};
use crate::content::{self, PageCopy, PAGE};
use crate::error::Error;
use crate::lifecycle::PagePhase;
use crate::retro_tv::TvPhase;

/// Theme colors resolved to linear RGBA, ready for an sRGB surface.
#[derive(Debug, Clone, Copy)]
pub struct ThemePalette {
    pub background: [f32; 4],
    pub foreground: [f32; 4],
    pub muted: [f32; 4],
    pub gradient: [[f32; 4]; 3],
}

impl ThemePalette {
    pub fn from_config(theme: &ThemeConfig) -> Self {
        let resolve = |hex: &str, fallback: [f32; 4]| {
            parse_hex_color(hex).map(srgb_to_linear).unwrap_or(fallback)
        };
        Self {
            background: resolve(&theme.background, [0.0, 0.0, 0.0, 1.0]),
            foreground: resolve(&theme.foreground, [1.0, 1.0, 1.0, 1.0]),
            muted: resolve(&theme.muted, [0.6, 0.6, 0.6, 1.0]),
            gradient: [
                resolve(&theme.gradient[0], [0.2, 0.5, 1.0, 1.0]),
                resolve(&theme.gradient[1], [0.6, 0.3, 1.0, 1.0]),
                resolve(&theme.gradient[2], [1.0, 0.3, 0.6, 1.0]),
            ],
        }
    }

    pub fn clear_color(&self) -> wgpu::Color {
        wgpu::Color {
            r: self.background[0] as f64,
            g: self.background[1] as f64,
            b: self.background[2] as f64,
            a: 1.0,
        }
    }
}

/// Linear blend across the three gradient stops at `t` in [0, 1].
pub fn gradient_color(stops: &[[f32; 4]; 3], t: f32) -> [f32; 4] {
    let t = t.clamp(0.0, 1.0) * 2.0;
    let (a, b, local) = if t < 1.0 {
        (stops[0], stops[1], t)
    } else {
        (stops[1], stops[2], t - 1.0)
    };
    let mut out = [0.0; 4];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = a[i] + (b[i] - a[i]) * local;
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone)]
pub struct TextSpan {
    pub text: String,
    pub color: [f32; 4],
}

#[derive(Debug, Clone)]
pub struct TextItem {
    pub spans: Vec<TextSpan>,
    /// Pixel position; the anchor for centered items is the midpoint.
    pub position: (f32, f32),
    pub scale: f32,
    pub bounds: (f32, f32),
    pub align: Align,
}

impl TextItem {
    fn plain(
        text: impl Into<String>,
        color: [f32; 4],
        position: (f32, f32),
        scale: f32,
        bounds: (f32, f32),
        align: Align,
    ) -> Self {
        Self {
            spans: vec![TextSpan {
                text: text.into(),
                color,
            }],
            position,
            scale,
            bounds,
            align,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PanelVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

const PANEL_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

/// Everything drawn for one frame of the 2D layer.
#[derive(Debug, Default, Clone)]
pub struct Scene {
    pub panel_vertices: Vec<PanelVertex>,
    pub panel_indices: Vec<u32>,
    pub texts: Vec<TextItem>,
}

impl Scene {
    fn text(&mut self, item: TextItem) {
        self.texts.push(item);
    }

    /// Append a rounded rectangle in pixel coordinates.
    fn panel(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        radius: f32,
        color: [f32; 4],
        viewport: (f32, f32),
    ) {
        if w <= 0.0 || h <= 0.0 || color[3] <= 0.0 {
            return;
        }
        let mut builder = Path::builder();
        builder.add_rounded_rectangle(
            &Box2D::new(point(x, y), point(x + w, y + h)),
            &BorderRadii::new(radius.min(w * 0.5).min(h * 0.5).max(0.0)),
            Winding::Positive,
        );
        let path = builder.build();
        let mut geometry: VertexBuffers<PanelVertex, u32> = VertexBuffers::new();
        let mut tessellator = FillTessellator::new();
        let result = tessellator.tessellate_path(
            &path,
            &FillOptions::default(),
            &mut BuffersBuilder::new(&mut geometry, |vertex: FillVertex| {
                let p = vertex.position();
                PanelVertex {
                    position: to_ndc(p.x, p.y, viewport.0, viewport.1),
                    color,
                }
            }),
        );
        if let Err(err) = result {
            warn!("panel tessellation failed: {err:?}");
            return;
        }
        let base = self.panel_vertices.len() as u32;
        self.panel_vertices.extend(geometry.vertices);
        self.panel_indices
            .extend(geometry.indices.iter().map(|i| base + i));
    }
}

fn to_ndc(x: f32, y: f32, width: f32, height: f32) -> [f32; 2] {
    [(x / width) * 2.0 - 1.0, 1.0 - (y / height) * 2.0]
}

fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha]
}

/// Snapshot of everything the 2D layer needs to draw one frame.
pub struct PageView<'a> {
    pub phase: PagePhase,
    pub scroll_vh: f32,
    /// Reveal alpha per section, in [`content::Section::ALL`] order.
    pub reveal: [f32; 3],
    pub form: Option<&'a ContactForm>,
    pub tv: TvPhase,
    pub error: Option<&'a ErrorPanel>,
}

fn reveal_for(view: &PageView<'_>, section: content::Section) -> f32 {
    let index = content::Section::ALL
        .iter()
        .position(|s| *s == section)
        .unwrap_or(0);
    view.reveal[index].clamp(0.0, 1.0)
}

/// Compose the full 2D scene for one frame.
pub fn compose_scene(
    view: &PageView<'_>,
    palette: &ThemePalette,
    width: f32,
    height: f32,
) -> Scene {
    let mut scene = Scene::default();
    let copy = &PAGE;
    let viewport = (width, height);

    if let Some(panel) = view.error {
        compose_error(&mut scene, panel, palette, viewport);
        return scene;
    }

    if view.phase == PagePhase::Loading {
        scene.text(TextItem::plain(
            copy.loading,
            palette.muted,
            (width * 0.5, height * 0.5),
            (height * 0.03).clamp(20.0, 34.0),
            viewport,
            Align::Center,
        ));
        return scene;
    }

    compose_hero(&mut scene, view, copy, palette, viewport);
    compose_features(&mut scene, view, copy, palette, viewport);
    compose_footer(&mut scene, view, copy, palette, viewport);

    if let Some(form) = view.form {
        compose_form(&mut scene, form, palette, viewport);
    }

    compose_tv(&mut scene, view.tv, copy, palette, viewport);
    scene
}

fn compose_hero(
    scene: &mut Scene,
    view: &PageView<'_>,
    copy: &PageCopy,
    palette: &ThemePalette,
    viewport: (f32, f32),
) {
    let (width, height) = viewport;
    let alpha = reveal_for(view, content::Section::Hero);
    if alpha <= 0.0 {
        return;
    }
    let top = (content::Section::Hero.top_vh() - view.scroll_vh) * height;
    let center_x = width * 0.5;

    let title_scale = (height * 0.12).clamp(48.0, 140.0);
    let chars: Vec<char> = copy.hero_title.chars().collect();
    let last = chars.len().saturating_sub(1).max(1) as f32;
    let spans = chars
        .iter()
        .enumerate()
        .map(|(i, c)| TextSpan {
            text: c.to_string(),
            color: with_alpha(gradient_color(&palette.gradient, i as f32 / last), alpha),
        })
        .collect();
    scene.text(TextItem {
        spans,
        position: (center_x, top + height * 0.32),
        scale: title_scale,
        bounds: viewport,
        align: Align::Center,
    });

    let tagline_scale = (height * 0.028).clamp(18.0, 32.0);
    scene.text(TextItem::plain(
        copy.hero_tagline,
        with_alpha(palette.muted, alpha),
        (center_x, top + height * 0.32 + title_scale + 28.0),
        tagline_scale,
        (width * 0.8, height),
        Align::Center,
    ));

    let cta_scale = (height * 0.024).clamp(16.0, 26.0);
    let cta_w = copy.call_to_action.chars().count() as f32 * cta_scale * 0.55 + 72.0;
    let cta_h = cta_scale + 34.0;
    let cta_y = top + height * 0.32 + title_scale + tagline_scale + 92.0;
    scene.panel(
        center_x - cta_w * 0.5,
        cta_y,
        cta_w,
        cta_h,
        cta_h * 0.5,
        with_alpha(palette.gradient[1], alpha * 0.85),
        viewport,
    );
    scene.text(TextItem::plain(
        copy.call_to_action,
        with_alpha(palette.foreground, alpha),
        (center_x, cta_y + (cta_h - cta_scale) * 0.5),
        cta_scale,
        viewport,
        Align::Center,
    ));
}

fn compose_features(
    scene: &mut Scene,
    view: &PageView<'_>,
    copy: &PageCopy,
    palette: &ThemePalette,
    viewport: (f32, f32),
) {
    let (width, height) = viewport;
    let alpha = reveal_for(view, content::Section::Features);
    if alpha <= 0.0 {
        return;
    }
    let top = (content::Section::Features.top_vh() - view.scroll_vh) * height;

    let card_w = (width * 0.28).min(420.0).max(220.0);
    let card_h = height * 0.42;
    let gap = 28.0;
    let row_w = card_w * 3.0 + gap * 2.0;
    let row_x = (width - row_w) * 0.5;
    let row_y = top + height * 0.18;

    for (i, feature) in copy.features.iter().enumerate() {
        let x = row_x + i as f32 * (card_w + gap);
        scene.panel(
            x,
            row_y,
            card_w,
            card_h,
            18.0,
            with_alpha(palette.foreground, alpha * 0.08),
            viewport,
        );
        let center = x + card_w * 0.5;
        scene.text(TextItem::plain(
            feature.icon,
            with_alpha(palette.foreground, alpha),
            (center, row_y + card_h * 0.16),
            44.0,
            (card_w, card_h),
            Align::Center,
        ));
        scene.text(TextItem::plain(
            feature.title,
            with_alpha(gradient_color(&palette.gradient, i as f32 / 2.0), alpha),
            (center, row_y + card_h * 0.42),
            26.0,
            (card_w - 32.0, card_h),
            Align::Center,
        ));
        scene.text(TextItem::plain(
            feature.description,
            with_alpha(palette.muted, alpha),
            (center, row_y + card_h * 0.58),
            18.0,
            (card_w - 48.0, card_h),
            Align::Center,
        ));
    }
}

fn compose_footer(
    scene: &mut Scene,
    view: &PageView<'_>,
    copy: &PageCopy,
    palette: &ThemePalette,
    viewport: (f32, f32),
) {
    let (width, height) = viewport;
    let alpha = reveal_for(view, content::Section::Footer);
    if alpha <= 0.0 {
        return;
    }
    let top = (content::Section::Footer.top_vh() - view.scroll_vh) * height;
    scene.text(TextItem::plain(
        copy.footer,
        with_alpha(palette.muted, alpha),
        (width * 0.5, top + height * 0.1),
        16.0,
        viewport,
        Align::Center,
    ));
}

const FORM_TITLE: &str = "Get In Touch";
const FORM_HINT: &str = "Tab to move between fields, Enter to send, Esc to close";

fn compose_form(
    scene: &mut Scene,
    form: &ContactForm,
    palette: &ThemePalette,
    viewport: (f32, f32),
) {
    let (width, height) = viewport;
    // Dim the page behind the modal.
    scene.panel(
        0.0,
        0.0,
        width,
        height,
        0.0,
        [0.0, 0.0, 0.0, 0.7],
        viewport,
    );

    let modal_w = (width * 0.46).clamp(360.0, 620.0);
    let row_h = 58.0;
    let message_h = row_h * 2.0;
    let modal_h = 96.0 + row_h * 3.0 + message_h + 20.0 * 4.0 + 64.0;
    let modal_x = (width - modal_w) * 0.5;
    let modal_y = (height - modal_h) * 0.5;
    scene.panel(
        modal_x,
        modal_y,
        modal_w,
        modal_h,
        20.0,
        with_alpha(palette.background, 0.95),
        viewport,
    );
    scene.text(TextItem::plain(
        FORM_TITLE,
        palette.foreground,
        (width * 0.5, modal_y + 28.0),
        30.0,
        (modal_w, modal_h),
        Align::Center,
    ));

    let field_x = modal_x + 32.0;
    let field_w = modal_w - 64.0;
    let mut cursor_y = modal_y + 92.0;
    for field in Field::ALL {
        let h = if field == Field::Message {
            message_h
        } else {
            row_h
        };
        let focused = form.focused() == field;
        let border = if focused {
            with_alpha(palette.gradient[0], 0.9)
        } else {
            with_alpha(palette.foreground, 0.15)
        };
        scene.panel(field_x - 2.0, cursor_y - 2.0, field_w + 4.0, h + 4.0, 10.0, border, viewport);
        scene.panel(
            field_x,
            cursor_y,
            field_w,
            h,
            8.0,
            palette.background,
            viewport,
        );
        scene.text(TextItem::plain(
            field.label(),
            palette.muted,
            (field_x + 12.0, cursor_y - 20.0),
            14.0,
            (field_w, row_h),
            Align::Left,
        ));
        let value = form.value(field);
        let (shown, color): (String, [f32; 4]) = if value.is_empty() {
            (field.placeholder().to_string(), with_alpha(palette.muted, 0.7))
        } else if focused {
            (format!("{value}_"), palette.foreground)
        } else {
            (value.to_string(), palette.foreground)
        };
        scene.text(TextItem::plain(
            shown,
            color,
            (field_x + 14.0, cursor_y + 16.0),
            18.0,
            (field_w - 28.0, h),
            Align::Left,
        ));
        cursor_y += h + 40.0;
    }

    let hint = if form.is_submitting() {
        "Sending..."
    } else {
        FORM_HINT
    };
    scene.text(TextItem::plain(
        hint,
        palette.muted,
        (width * 0.5, modal_y + modal_h - 40.0),
        14.0,
        (modal_w, modal_h),
        Align::Center,
    ));
}

fn compose_tv(
    scene: &mut Scene,
    tv: TvPhase,
    copy: &PageCopy,
    palette: &ThemePalette,
    viewport: (f32, f32),
) {
    let (width, height) = viewport;
    match tv {
        TvPhase::Idle => {}
        TvPhase::FlashCollapse {
            scale_x,
            scale_y,
            darkness,
        } => {
            if darkness > 0.0 {
                scene.panel(
                    0.0,
                    0.0,
                    width,
                    height,
                    0.0,
                    [0.0, 0.0, 0.0, darkness],
                    viewport,
                );
            }
            let flash_w = width * scale_x.max(0.003);
            let flash_h = height * scale_y.max(0.003);
            scene.panel(
                (width - flash_w) * 0.5,
                (height - flash_h) * 0.5,
                flash_w,
                flash_h,
                2.0,
                [1.0, 1.0, 1.0, 0.95],
                viewport,
            );
        }
        TvPhase::MessageVisible { text_alpha } => {
            scene.panel(0.0, 0.0, width, height, 0.0, [0.0, 0.0, 0.0, 1.0], viewport);
            scene.text(TextItem::plain(
                copy.thank_you_title,
                with_alpha(palette.foreground, text_alpha),
                (width * 0.5, height * 0.44),
                (height * 0.07).clamp(40.0, 84.0),
                viewport,
                Align::Center,
            ));
            scene.text(TextItem::plain(
                copy.thank_you_subtitle,
                with_alpha(palette.muted, text_alpha),
                (width * 0.5, height * 0.58),
                24.0,
                viewport,
                Align::Center,
            ));
        }
    }
}

fn compose_error(
    scene: &mut Scene,
    panel: &ErrorPanel,
    palette: &ThemePalette,
    viewport: (f32, f32),
) {
    let (width, height) = viewport;
    scene.panel(0.0, 0.0, width, height, 0.0, [0.0, 0.0, 0.0, 0.85], viewport);
    let modal_w = (width * 0.5).clamp(360.0, 680.0);
    let modal_h = height * 0.3;
    scene.panel(
        (width - modal_w) * 0.5,
        (height - modal_h) * 0.5,
        modal_w,
        modal_h,
        16.0,
        with_alpha(palette.foreground, 0.08),
        viewport,
    );
    scene.text(TextItem::plain(
        panel.title.clone(),
        palette.foreground,
        (width * 0.5, height * 0.4),
        32.0,
        (modal_w - 48.0, modal_h),
        Align::Center,
    ));
    scene.text(TextItem::plain(
        panel.detail.clone(),
        palette.muted,
        (width * 0.5, height * 0.47),
        18.0,
        (modal_w - 48.0, modal_h),
        Align::Center,
    ));
    scene.text(TextItem::plain(
        panel.hint.clone(),
        with_alpha(palette.gradient[0], 1.0),
        (width * 0.5, height * 0.54),
        16.0,
        (modal_w - 48.0, modal_h),
        Align::Center,
    ));
}

/// Pick a sans-serif face from the system font database.
pub fn load_system_font() -> Result<FontArc, Error> {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    let query = fontdb::Query {
        families: &[fontdb::Family::SansSerif],
        ..Default::default()
    };
    let id = db
        .query(&query)
        .ok_or_else(|| Error::NoFont("no sans-serif face installed".to_string()))?;
    db.with_face_data(id, |data, index| {
        wgpu_glyph::ab_glyph::FontVec::try_from_vec_and_index(data.to_vec(), index)
            .ok()
            .map(FontArc::from)
    })
    .flatten()
    .ok_or_else(|| Error::NoFont("failed to load the selected face".to_string()))
}

pub struct PageRenderer {
    pipeline: wgpu::RenderPipeline,
    glyph_brush: GlyphBrush<()>,
    staging_belt: wgpu::util::StagingBelt,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    index_count: u32,
}

const PANEL_SHADER: &str = r#"
struct VsOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(@location(0) position: vec2<f32>, @location(1) color: vec4<f32>) -> VsOut {
    var out: VsOut;
    out.clip = vec4<f32>(position, 0.0, 1.0);
    out.color = color;
    return out;
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

impl PageRenderer {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Result<Self, Error> {
        let font = load_system_font()?;
        let glyph_brush = GlyphBrushBuilder::using_font(font).build(device, format);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("panel-shader"),
            source: wgpu::ShaderSource::Wgsl(PANEL_SHADER.into()),
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("panel-layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("panel-pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<PanelVertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &PANEL_ATTRIBUTES,
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            pipeline,
            glyph_brush,
            staging_belt: wgpu::util::StagingBelt::new(1024),
            vertex_buffer: None,
            index_buffer: None,
            index_count: 0,
        })
    }

    /// Draw one composed scene. The caller submits the encoder and must call
    /// [`PageRenderer::after_submit`] once per frame afterwards.
    pub fn draw(
        &mut self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        width: u32,
        height: u32,
        scene: &Scene,
    ) -> Result<(), Error> {
        if scene.panel_indices.is_empty() {
            self.vertex_buffer = None;
            self.index_buffer = None;
            self.index_count = 0;
        } else {
            self.vertex_buffer = Some(device.create_buffer_init(
                &wgpu::util::BufferInitDescriptor {
                    label: Some("panel-vertices"),
                    contents: bytemuck::cast_slice(&scene.panel_vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                },
            ));
            self.index_buffer = Some(device.create_buffer_init(
                &wgpu::util::BufferInitDescriptor {
                    label: Some("panel-indices"),
                    contents: bytemuck::cast_slice(&scene.panel_indices),
                    usage: wgpu::BufferUsages::INDEX,
                },
            ));
            self.index_count = scene.panel_indices.len() as u32;
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("page-panels"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if let (Some(vertices), Some(indices)) = (&self.vertex_buffer, &self.index_buffer) {
                pass.set_pipeline(&self.pipeline);
                pass.set_vertex_buffer(0, vertices.slice(..));
                pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..self.index_count, 0, 0..1);
            }
        }

        for item in &scene.texts {
            let layout = match item.align {
                Align::Left => Layout::default_wrap(),
                Align::Center => Layout::default_wrap().h_align(HorizontalAlign::Center),
            };
            self.glyph_brush.queue(Section {
                screen_position: item.position,
                bounds: item.bounds,
                layout,
                text: item
                    .spans
                    .iter()
                    .map(|span| {
                        Text::new(&span.text)
                            .with_scale(item.scale)
                            .with_color(span.color)
                    })
                    .collect(),
            });
        }
        self.glyph_brush
            .draw_queued(
                device,
                &mut self.staging_belt,
                encoder,
                target,
                width,
                height,
            )
            .map_err(|err| Error::Render(anyhow::anyhow!(err)))?;
        self.staging_belt.finish();
        Ok(())
    }

    pub fn after_submit(&mut self) {
        self.staging_belt.recall();
    }
}
