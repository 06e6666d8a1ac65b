// src/interception/points.rs
//! Catalogue of intercept points and their event names

use serde::Serialize;

/// Every hookable call site in the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Point {
    ResetGame,
    Logic,
    LogicRace,
    LogicRound,
    LogicWorld,
    LogicTerminator,
    LogicCoop,
    LogicVersus,
    PlayerActions,
    Physics,
    InPacket,
    SendPacket,
    PhysicsBullets,
    AccountsSave,
    AccountTicket,
    SendConnectResponse,
    PlayerCreate,
    PlayerDelete,
    HumanCreate,
    HumanDelete,
    ItemCreate,
    ItemDelete,
    VehicleCreate,
    VehicleDelete,
    RigidBodyCreate,
    ItemLink,
    ItemComputerInput,
    HumanDamage,
    HumanCollisionVehicle,
    HumanGrabbing,
    GrenadeExplode,
    PlayerChat,
    PlayerAI,
    PlayerDeathTax,
    CollideBodies,
    EventMessage,
    EventUpdatePlayer,
    EventUpdatePlayerFinance,
    EventUpdateVehicle,
    EventBulletHit,
    LineIntersectHuman,
}

/// Events fired from inside the tick rather than by a dedicated call site
pub const INTERRUPT_SIGNAL: &str = "InterruptSignal";
pub const CONSOLE_INPUT: &str = "ConsoleInput";

/// Pre-stage events of the two-stage account ticket lookup
pub const ACCOUNT_TICKET_BEGIN: &str = "AccountTicketBegin";
pub const ACCOUNT_TICKET_FOUND: &str = "AccountTicketFound";

impl Point {
    pub const COUNT: usize = 41;

    pub const ALL: [Point; Point::COUNT] = [
        Point::ResetGame,
        Point::Logic,
        Point::LogicRace,
        Point::LogicRound,
        Point::LogicWorld,
        Point::LogicTerminator,
        Point::LogicCoop,
        Point::LogicVersus,
        Point::PlayerActions,
        Point::Physics,
        Point::InPacket,
        Point::SendPacket,
        Point::PhysicsBullets,
        Point::AccountsSave,
        Point::AccountTicket,
        Point::SendConnectResponse,
        Point::PlayerCreate,
        Point::PlayerDelete,
        Point::HumanCreate,
        Point::HumanDelete,
        Point::ItemCreate,
        Point::ItemDelete,
        Point::VehicleCreate,
        Point::VehicleDelete,
        Point::RigidBodyCreate,
        Point::ItemLink,
        Point::ItemComputerInput,
        Point::HumanDamage,
        Point::HumanCollisionVehicle,
        Point::HumanGrabbing,
        Point::GrenadeExplode,
        Point::PlayerChat,
        Point::PlayerAI,
        Point::PlayerDeathTax,
        Point::CollideBodies,
        Point::EventMessage,
        Point::EventUpdatePlayer,
        Point::EventUpdatePlayerFinance,
        Point::EventUpdateVehicle,
        Point::EventBulletHit,
        Point::LineIntersectHuman,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// (pre event, post event)
    pub fn events(self) -> (&'static str, &'static str) {
        match self {
            Point::ResetGame => ("ResetGame", "PostResetGame"),
            Point::Logic => ("Logic", "PostLogic"),
            Point::LogicRace => ("LogicRace", "PostLogicRace"),
            Point::LogicRound => ("LogicRound", "PostLogicRound"),
            Point::LogicWorld => ("LogicWorld", "PostLogicWorld"),
            Point::LogicTerminator => ("LogicTerminator", "PostLogicTerminator"),
            Point::LogicCoop => ("LogicCoop", "PostLogicCoop"),
            Point::LogicVersus => ("LogicVersus", "PostLogicVersus"),
            Point::PlayerActions => ("PlayerActions", "PostPlayerActions"),
            Point::Physics => ("Physics", "PostPhysics"),
            Point::InPacket => ("InPacket", "PostInPacket"),
            Point::SendPacket => ("SendPacket", "PostSendPacket"),
            Point::PhysicsBullets => ("PhysicsBullets", "PostPhysicsBullets"),
            Point::AccountsSave => ("AccountsSave", "PostAccountsSave"),
            Point::AccountTicket => ("AccountTicket", "PostAccountTicket"),
            Point::SendConnectResponse => ("SendConnectResponse", "PostSendConnectResponse"),
            Point::PlayerCreate => ("PlayerCreate", "PostPlayerCreate"),
            Point::PlayerDelete => ("PlayerDelete", "PostPlayerDelete"),
            Point::HumanCreate => ("HumanCreate", "PostHumanCreate"),
            Point::HumanDelete => ("HumanDelete", "PostHumanDelete"),
            Point::ItemCreate => ("ItemCreate", "PostItemCreate"),
            Point::ItemDelete => ("ItemDelete", "PostItemDelete"),
            Point::VehicleCreate => ("VehicleCreate", "PostVehicleCreate"),
            Point::VehicleDelete => ("VehicleDelete", "PostVehicleDelete"),
            Point::RigidBodyCreate => ("RigidBodyCreate", "PostRigidBodyCreate"),
            Point::ItemLink => ("ItemLink", "PostItemLink"),
            Point::ItemComputerInput => ("ItemComputerInput", "PostItemComputerInput"),
            Point::HumanDamage => ("HumanDamage", "PostHumanDamage"),
            Point::HumanCollisionVehicle => ("HumanCollisionVehicle", "PostHumanCollisionVehicle"),
            Point::HumanGrabbing => ("HumanGrabbing", "PostHumanGrabbing"),
            Point::GrenadeExplode => ("GrenadeExplode", "PostGrenadeExplode"),
            Point::PlayerChat => ("PlayerChat", "PostPlayerChat"),
            Point::PlayerAI => ("PlayerAI", "PostPlayerAI"),
            Point::PlayerDeathTax => ("PlayerDeathTax", "PostPlayerDeathTax"),
            Point::CollideBodies => ("CollideBodies", "PostCollideBodies"),
            Point::EventMessage => ("EventMessage", "PostEventMessage"),
            Point::EventUpdatePlayer => ("EventUpdatePlayer", "PostEventUpdatePlayer"),
            Point::EventUpdatePlayerFinance => {
                ("EventUpdatePlayerFinance", "PostEventUpdatePlayerFinance")
            }
            Point::EventUpdateVehicle => ("EventUpdateVehicle", "PostEventUpdateVehicle"),
            Point::EventBulletHit => ("EventBulletHit", "PostEventBulletHit"),
            Point::LineIntersectHuman => ("LineIntersectHuman", "PostLineIntersectHuman"),
        }
    }

    pub fn name(self) -> &'static str {
        self.events().0
    }

    /// Installed at boot and never removed by the script layer.
    ///
    /// The tick driver and every entity create/delete site must stay
    /// redirected so queue draining and shadow-state cleanup always happen.
    pub fn is_core(self) -> bool {
        matches!(
            self,
            Point::ResetGame
                | Point::Logic
                | Point::PlayerCreate
                | Point::PlayerDelete
                | Point::HumanCreate
                | Point::HumanDelete
                | Point::ItemCreate
                | Point::ItemDelete
                | Point::VehicleCreate
                | Point::VehicleDelete
                | Point::RigidBodyCreate
        )
    }

    /// Resolve a script event name ("X" or "PostX") to its point
    pub fn from_event(name: &str) -> Option<Point> {
        match name {
            INTERRUPT_SIGNAL | CONSOLE_INPUT => return Some(Point::Logic),
            ACCOUNT_TICKET_BEGIN | ACCOUNT_TICKET_FOUND => return Some(Point::AccountTicket),
            // No script hooks on the rigid body path
            "RigidBodyCreate" | "PostRigidBodyCreate" => return None,
            "PostLineIntersectHuman" => return None,
            _ => {}
        }

        Point::ALL.iter().copied().find(|point| {
            let (pre, post) = point.events();
            pre == name || post == name
        })
    }
}
