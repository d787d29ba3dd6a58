use bitflags::bitflags;

bitflags! {
    /// Static physics flags carried by every actor definition.
    ///
    /// Read-only at runtime: the resolver and raycasters only *read*
    /// these, they are never toggled on a live body.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct BodyFlags: u16 {
        // May be displaced by collision resolution.
        const SIMULATED            = 0x0001;
        // Pushed out of solid tiles and clamped to the slab.
        const COLLIDES_WITH_WORLD  = 0x0002;
        // Takes part in actor-vs-actor separation.
        const COLLIDES_WITH_ACTORS = 0x0004;
        // Dies on world contact instead of sliding.
        const PROJECTILE           = 0x0008;
        // Keeps its z coordinate during physics integration.
        const FLYING               = 0x0010;
    }
}

bitflags! {
    /// Runtime status of one body.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct StatusFlags: u8 {
        // Swept and freed at end of frame.
        const DEAD            = 0x01;
        // Health ran out; lingers until the corpse timer expires.
        const CORPSE          = 0x02;
        // Projectile touched floor / ceiling / wall this frame.
        const PROJECTILE_DEAD = 0x04;
    }
}
