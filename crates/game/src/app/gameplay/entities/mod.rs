mod item;
mod npc;
mod player;
mod vehicle;

pub(crate) use item::{Item, ItemKind, ITEM_SIZE};
pub(crate) use npc::{Npc, NpcVisual, PatrolAxis};
pub(crate) use player::{
    AttackAnimation, MovementScheme, Player, ATTACK_DURATION_TICKS, PLAYER_HITBOX_INSET, PLAYER_SIZE,
};
pub(crate) use vehicle::{SheetConfig, Vehicle};

#[cfg(test)]
pub(crate) use npc::NPC_SIZE;
#[cfg(test)]
pub(crate) use player::{Facing, PLAYER_SPEED};
#[cfg(test)]
pub(crate) use vehicle::VEHICLE_SIZE;
