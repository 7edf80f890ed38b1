//! # Board Game Demo
//!
//! An isometric endless runner: a boarder dodges trees while the terrain scrolls past.
//! Ships with the binary and doubles as an end-to-end exercise of the framework.

use crate::game::{Animator, Entity, EntityId, FrameContext, Framework, Game};
use crate::content::ContentHandler;
use crate::rendering::{Bitmap, ImageHandle, Rgba};
use crate::utils::Mat2;
use crate::PixelFwResult;
use macroquad::prelude::KeyCode;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::FRAC_PI_4;

/// Columns in the player and board sprite sheets.
pub const PLAYER_SHEET_COLS: u32 = 27;

const GRAVITY: f32 = 500.0;
const JUMP_IMPULSE: f32 = 600.0;
/// Height below which the player counts as grounded.
const GROUND_EPSILON: f32 = 3.0;
const LATERAL_SPEED: f32 = 250.0;
const SCROLL_SPEED: f32 = 600.0;
const TERRAIN_WRAP: f32 = -540.0;
const TREE_INTERVAL: f32 = 0.1;
const TREE_LIFETIME: f32 = 5.0;
const TREE_SPAWN_X: f32 = 1000.0;
const TREE_LANE_Y: f32 = 540.0;
const TREE_SPREAD: f32 = 200.0;

/// Asset names and the files they load from.
const ASSETS: [(&str, &str); 4] = [
    ("player", "player.png"),
    ("board0", "board0.png"),
    ("terrain", "terrain.png"),
    ("tree", "tree.png"),
];

fn projection() -> Mat2 {
    Mat2::scaling(1.0, 0.65) * Mat2::rotation(FRAC_PI_4)
}

/// Maps a point in game space (with height `z`) to world-space screen coordinates.
pub fn space_to_screen(x: f32, y: f32, z: f32) -> (f32, f32) {
    let (sx, sy) = projection().transform(x, y);
    (sx, sy - z)
}

/// Maps a screen point back onto the ground plane.
pub fn screen_to_space(x: f32, y: f32) -> Option<(f32, f32)> {
    projection().inverse().map(|inv| inv.transform(x, y))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Left,
    Right,
    Jump,
    Land,
}

/// The boarder.
#[derive(Debug, Clone)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub vz: f32,
    pub state: PlayerState,
    anim: Animator,
    sprite: Option<ImageHandle>,
    board: Option<ImageHandle>,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    /// Starts airborne, so the first frames play the landing.
    pub fn new() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 100.0,
            vz: 0.0,
            state: PlayerState::Idle,
            anim: Animator::new(),
            sprite: None,
            board: None,
        }
    }

    pub fn jump(&mut self) {
        self.vz += JUMP_IMPULSE;
    }

    pub fn is_airborne(&self) -> bool {
        matches!(self.state, PlayerState::Jump | PlayerState::Land)
    }

    pub fn frame(&self) -> u32 {
        self.anim.frame()
    }

    fn integrate(&mut self, dt: f32) {
        self.vz -= GRAVITY * dt;
        self.z += self.vz * dt;

        if self.z >= GROUND_EPSILON {
            self.state = PlayerState::Jump;
        } else {
            self.z = 0.0;
            self.vz = self.vz.max(0.0);
            if self.state == PlayerState::Jump {
                self.state = PlayerState::Land;
            }
        }
    }

    fn animate(&mut self) {
        match self.state {
            PlayerState::Idle => self.anim.play("stand", 0.01, true),
            PlayerState::Left => self.anim.play("left", 1.0 / 20.0, false),
            PlayerState::Right => self.anim.play("right", 1.0 / 20.0, false),
            PlayerState::Jump => self.anim.play("jump", 1.0 / 20.0, false),
            PlayerState::Land => {
                self.anim.play("land", 1.0 / 30.0, false);
                if self.anim.frame() == 19 {
                    self.state = PlayerState::Idle;
                }
            }
        }
    }
}

impl Entity for Player {
    fn tag(&self) -> &str {
        "player"
    }

    fn on_create(&mut self, ctx: &mut FrameContext<'_>) {
        self.sprite = ctx.content.get("player");
        self.board = ctx.content.get("board0");

        self.anim.add("stand", &[0]);
        self.anim.add("left", &[1, 2, 3, 4]);
        self.anim.add("right", &[6, 7, 8, 9]);
        self.anim.add("jump", &[10, 11, 12, 13, 14]);
        self.anim.add("land", &[15, 16, 17, 18, 19]);
        self.anim.add("die", &[20, 21, 22, 23, 24, 25, 26]);
    }

    fn on_update(&mut self, _ctx: &mut FrameContext<'_>, dt: f32) {
        self.integrate(dt);
        self.animate();
        self.anim.update(dt);
    }

    fn on_draw(&mut self, ctx: &mut FrameContext<'_>) {
        let (px, py) = space_to_screen(self.x, self.y, self.z);
        let (bx, by) = space_to_screen(self.x + 5.0, self.y + 1.0, self.z + 28.0);
        let frame = self.anim.frame();

        if let Some(board) = &self.board {
            ctx.renderer
                .tile(board, px, py, 0.5, 0.5, frame, 1, PLAYER_SHEET_COLS, None);
        }
        if let Some(sprite) = &self.sprite {
            ctx.renderer
                .tile(sprite, bx, by, 0.5, 0.5, frame, 1, PLAYER_SHEET_COLS, None);
        }
    }
}

/// A tree scrolling towards the player.
#[derive(Debug, Clone)]
pub struct Tree {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    sprite: Option<ImageHandle>,
}

impl Tree {
    pub fn new(x: f32, y: f32, speed: f32) -> Self {
        Self {
            x,
            y,
            speed,
            sprite: None,
        }
    }
}

impl Entity for Tree {
    fn tag(&self) -> &str {
        "tree"
    }

    fn on_create(&mut self, ctx: &mut FrameContext<'_>) {
        self.sprite = ctx.content.get("tree");
    }

    fn on_update(&mut self, _ctx: &mut FrameContext<'_>, dt: f32) {
        self.x -= dt * self.speed;
    }

    fn on_draw(&mut self, ctx: &mut FrameContext<'_>) {
        if let Some(sprite) = &self.sprite {
            let (sx, sy) = space_to_screen(self.x, self.y, 0.0);
            ctx.renderer.tile(sprite, sx, sy, 0.5, 0.87, 0, 1, 1, None);
        }
    }
}

/// Every kind of entity in the demo.
#[derive(Debug, Clone)]
pub enum DemoEntity {
    Player(Player),
    Tree(Tree),
}

impl Entity for DemoEntity {
    fn tag(&self) -> &str {
        match self {
            DemoEntity::Player(p) => p.tag(),
            DemoEntity::Tree(t) => t.tag(),
        }
    }

    fn on_create(&mut self, ctx: &mut FrameContext<'_>) {
        match self {
            DemoEntity::Player(p) => p.on_create(ctx),
            DemoEntity::Tree(t) => t.on_create(ctx),
        }
    }

    fn on_update(&mut self, ctx: &mut FrameContext<'_>, dt: f32) {
        match self {
            DemoEntity::Player(p) => p.on_update(ctx, dt),
            DemoEntity::Tree(t) => t.on_update(ctx, dt),
        }
    }

    fn on_draw(&mut self, ctx: &mut FrameContext<'_>) {
        match self {
            DemoEntity::Player(p) => p.on_draw(ctx),
            DemoEntity::Tree(t) => t.on_draw(ctx),
        }
    }
}

/// A sprite sheet of `cols` solid cells, each with a darker one-pixel border.
pub fn placeholder_sheet(cell_w: u32, cell_h: u32, cols: u32, color: Rgba) -> Bitmap {
    let mut sheet = Bitmap::new(cell_w * cols, cell_h);
    let [r, g, b, _] = color.to_rgba8();
    let border = [r / 2, g / 2, b / 2];
    for y in 0..cell_h {
        for x in 0..cell_w * cols {
            let cx = x % cell_w;
            let edge = cx == 0 || y == 0 || cx == cell_w - 1 || y == cell_h - 1;
            sheet.put_pixel(x as i32, y as i32, if edge { border } else { [r, g, b] });
        }
    }
    sheet
}

/// Registers generated stand-ins for any demo asset that failed to load.
pub fn install_placeholders(content: &mut ContentHandler) {
    for (name, _) in ASSETS {
        if content.contains(name) {
            continue;
        }
        log::warn!("Asset '{}' missing, using a generated placeholder", name);
        let bitmap = match name {
            "player" => placeholder_sheet(16, 32, PLAYER_SHEET_COLS, Rgba::rgb(0.9, 0.3, 0.2)),
            "board0" => placeholder_sheet(32, 8, PLAYER_SHEET_COLS, Rgba::rgb(0.3, 0.3, 0.8)),
            "tree" => placeholder_sheet(24, 48, 1, Rgba::rgb(0.1, 0.6, 0.2)),
            _ => placeholder_sheet(540, 120, 1, Rgba::rgb(0.85, 0.85, 0.9)),
        };
        content.insert(name, bitmap);
    }
}

/// The demo game.
pub struct BoardGame {
    player: Option<EntityId>,
    bg: f32,
    tree_time: f32,
    speed: f32,
    rng: StdRng,
    finished: bool,
}

impl BoardGame {
    pub fn new(seed: u64) -> Self {
        Self {
            player: None,
            bg: 0.0,
            tree_time: 0.0,
            speed: SCROLL_SPEED,
            rng: StdRng::seed_from_u64(seed),
            finished: false,
        }
    }

    pub fn player_id(&self) -> Option<EntityId> {
        self.player
    }

    /// Terrain scroll offset, in (-540, 0].
    pub fn scroll(&self) -> f32 {
        self.bg
    }

    fn spawn_tree(&mut self, fw: &mut Framework<DemoEntity>, lane: f32) {
        let offset = self.rng.gen_range(-1.0f32..1.0) * TREE_SPREAD;
        let tree = Tree::new(TREE_SPAWN_X, lane + offset, self.speed);
        let id = fw.entities.add(DemoEntity::Tree(tree));
        fw.entities.destroy(id, TREE_LIFETIME);
    }
}

impl Game<DemoEntity> for BoardGame {
    fn on_load(&mut self, content: &mut ContentHandler) -> PixelFwResult<()> {
        for (name, file) in ASSETS {
            content.add_image(name, file);
        }
        Ok(())
    }

    fn on_start(&mut self, fw: &mut Framework<DemoEntity>) -> PixelFwResult<()> {
        install_placeholders(&mut fw.content);
        self.player = Some(fw.entities.add(DemoEntity::Player(Player::new())));
        Ok(())
    }

    fn on_update(&mut self, fw: &mut Framework<DemoEntity>, dt: f32) -> PixelFwResult<()> {
        let jump = fw.input.is_key_pressed(KeyCode::Space);
        let left = fw.input.is_key_down(KeyCode::Left);
        let right = fw.input.is_key_down(KeyCode::Right);
        if fw.input.is_key_pressed(KeyCode::Escape) {
            log::info!("Escape pressed, leaving the board");
            self.finished = true;
        }

        if let Some(DemoEntity::Player(player)) =
            self.player.and_then(|id| fw.entities.get_mut(id))
        {
            if jump && !player.is_airborne() {
                player.jump();
            }
            // Landing counts as airborne, so steering waits for the landing animation.
            if !player.is_airborne() {
                if left {
                    player.y += dt * LATERAL_SPEED;
                    player.state = PlayerState::Right;
                } else if right {
                    player.y -= dt * LATERAL_SPEED;
                    player.state = PlayerState::Left;
                } else {
                    player.state = PlayerState::Idle;
                }
            }
        }

        self.bg -= dt * self.speed;
        if self.bg <= TERRAIN_WRAP {
            self.bg = 0.0;
        }

        self.tree_time += dt;
        if self.tree_time >= TREE_INTERVAL {
            self.tree_time = 0.0;
            self.spawn_tree(fw, TREE_LANE_Y);
            self.spawn_tree(fw, -TREE_LANE_Y);
        }
        Ok(())
    }

    fn on_draw(&mut self, fw: &mut Framework<DemoEntity>) -> PixelFwResult<()> {
        let terrain = fw.content.image("terrain")?;
        let renderer = &mut fw.renderer;
        renderer.clear_rgb8(255, 255, 255);

        for row in -1..2 {
            let lane = row as f32 * 300.0;
            for col in -1..3 {
                let x = col as f32 * 540.0 + self.bg;
                let (sx, sy) = space_to_screen(x, -45.0 + lane, 0.0);
                renderer.tile(&terrain, sx, sy, 0.5, 0.5, 0, 1, 1, None);
            }
        }

        fw.render_entities(Some("player"));
        fw.render_entities(Some("tree"));
        fw.flush();
        Ok(())
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}
