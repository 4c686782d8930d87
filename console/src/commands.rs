//! Command dispatch.
//!
//! Every command builds its client from the stored session, except `login`.
//! Forms are validated before the session is even read, so a rejected form
//! never reaches the network.

use std::io::Write;

use anyhow::{Result, anyhow};
use chrono::{NaiveDate, Utc};
use tracing::debug;

use fleet_app::boards::{IncidentBoard, RouteAssignmentBoard, UserBoard, VehicleDriverBoard};
use fleet_app::client::FleetClient;
use fleet_app::config::Config;
use fleet_app::filters::{
    DriverFilter, Filter, IncidentFilter, RouteAssignmentFilter, RouteFilter, UserFilter,
    VehicleDriverFilter, VehicleFilter,
};
use fleet_app::forms::{
    DriverEdit, DriverForm, IncidentEdit, IncidentForm, RoleEdit, RoleForm, RouteAssignmentEdit,
    RouteAssignmentForm, RouteEdit, RouteForm, UserEdit, UserForm, VehicleEdit, VehicleForm,
    set_assignment_status,
};
use fleet_app::guard::{self, Confirm, Outcome};
use fleet_app::labels::{
    display_date, display_time, incident_kind_label, incident_status_badge, severity_badge,
    status_badge,
};
use fleet_app::models::{
    Driver, Incident, Resource, Role, Route, RouteAssignment, Severity, Status, User, Vehicle,
    VehicleDriverAssignment,
};
use fleet_app::resolver::{
    Identified, assignment_driver_label, assignment_vehicle_label, fallback_label,
    resolve_assignment_label, resolve_label, role_label,
};
use fleet_app::session::{Session, SessionStore};

use crate::cli::{
    Cli, Command, DriverAction, DriverListArgs, IncidentAction, IncidentListArgs, RoleAction,
    RouteAction, RouteAssignmentAction, RouteAssignmentListArgs, RouteListArgs, UnitDriverAction,
    UnitDriverListArgs, UserAction, UserListArgs, VehicleAction, VehicleListArgs,
};
use crate::prompt::AutoConfirm;
use crate::render::{Table, badge};

/// Per-invocation state shared by every command.
pub struct Context<'a, W: Write, C: Confirm> {
    pub config: &'a Config,
    pub out: &'a mut W,
    pub confirm: &'a mut C,
    /// Anchor for dates and times entered without a day.
    pub today: NaiveDate,
}

/// Resolves configuration from the environment and the global flags, then
/// runs the parsed command.
pub async fn run<W: Write, C: Confirm>(cli: Cli, out: &mut W, confirm: &mut C) -> Result<()> {
    let config = Config::from_env()?.with_overrides(cli.api_url.as_deref(), cli.session_file)?;
    debug!("Using backend {}", config.api_url);

    let mut ctx = Context {
        config: &config,
        out,
        confirm,
        today: Utc::now().date_naive(),
    };
    execute(cli.command, &mut ctx).await
}

pub async fn execute<W: Write, C: Confirm>(
    command: Command,
    ctx: &mut Context<'_, W, C>,
) -> Result<()> {
    match command {
        Command::Login { email, password } => login(ctx, &email, &password).await,
        Command::Logout => {
            store(ctx.config).clear()?;
            writeln!(ctx.out, "Sesión cerrada")?;
            Ok(())
        }
        Command::Whoami => whoami(ctx),
        Command::Vehicles { action } => vehicles(ctx, action).await,
        Command::Drivers { action } => drivers(ctx, action).await,
        Command::Routes { action } => routes(ctx, action).await,
        Command::Roles { action } => roles(ctx, action).await,
        Command::Users { action } => users(ctx, action).await,
        Command::UnitDrivers { action } => unit_drivers(ctx, action).await,
        Command::RouteAssignments { action } => route_assignments(ctx, action).await,
        Command::Incidents { action } => incidents(ctx, action).await,
    }
}

fn store(config: &Config) -> SessionStore {
    SessionStore::new(config.session_file.clone())
}

/// Client carrying the stored token; fails when nobody is signed in.
fn session_client(config: &Config) -> Result<FleetClient> {
    let session = store(config).require()?;
    Ok(FleetClient::from_config(config)?.authenticated(&session))
}

/// Fetches the current record for an update.
async fn fetch_one<R: Resource + Identified>(client: &FleetClient, id: &str) -> Result<R> {
    client
        .list::<R>()
        .await?
        .into_iter()
        .find(|r| r.id() == id)
        .ok_or_else(|| anyhow!("No se encontró {}", fallback_label::<R>(id)))
}

fn status_cell(status: Status) -> String {
    badge(status.as_wire(), status_badge(status))
}

// === Session ===

async fn login<W: Write, C: Confirm>(
    ctx: &mut Context<'_, W, C>,
    email: &str,
    password: &str,
) -> Result<()> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(fleet_app::FleetError::Validation(
            "Ingresa tu correo y contraseña".to_string(),
        )
        .into());
    }
    let client = FleetClient::from_config(ctx.config)?;
    let session: Session = client.login(email.trim(), password).await?;
    store(ctx.config).save(&session)?;
    writeln!(ctx.out, "Bienvenido, {}", session.display_name())?;
    Ok(())
}

fn whoami<W: Write, C: Confirm>(ctx: &mut Context<'_, W, C>) -> Result<()> {
    let session = store(ctx.config).require()?;
    writeln!(ctx.out, "{}", session.display_name())?;
    if !session.user.email.is_empty() {
        writeln!(ctx.out, "Email: {}", session.user.email)?;
    }
    if let Some(role_id) = &session.user.role_id {
        writeln!(ctx.out, "Rol: {role_id}")?;
    }
    Ok(())
}

// === Vehicles ===

impl From<VehicleListArgs> for VehicleFilter {
    fn from(args: VehicleListArgs) -> Self {
        Self {
            plate: args.plate,
            model: args.model,
            min_capacity: args.min_capacity,
            max_capacity: args.max_capacity,
            status: args.status,
        }
    }
}

async fn vehicles<W: Write, C: Confirm>(
    ctx: &mut Context<'_, W, C>,
    action: VehicleAction,
) -> Result<()> {
    match action {
        VehicleAction::List(args) => {
            let client = session_client(ctx.config)?;
            let records = VehicleFilter::from(args).apply(client.list::<Vehicle>().await?);
            let mut table = Table::new(&["ID", "Placa", "Modelo", "Capacidad", "Estado"]);
            for v in records {
                table.row(vec![
                    v.id,
                    v.plate,
                    v.model,
                    v.capacity.to_string(),
                    status_cell(v.status),
                ]);
            }
            table.write_to(ctx.out)?;
        }
        VehicleAction::Create {
            plate,
            model,
            capacity,
            status,
        } => {
            let body = VehicleForm {
                plate,
                model,
                capacity,
                status,
            }
            .into_new()?;
            let client = session_client(ctx.config)?;
            client.create::<Vehicle, _>(&body).await?;
            writeln!(ctx.out, "Unidad creada correctamente")?;
        }
        VehicleAction::Update {
            id,
            plate,
            model,
            capacity,
            status,
        } => {
            let client = session_client(ctx.config)?;
            let current: Vehicle = fetch_one(&client, &id).await?;
            let updated = VehicleEdit {
                plate,
                model,
                capacity,
                status,
            }
            .apply_to(&current)?;
            client.update::<Vehicle, _>(&id, &updated).await?;
            writeln!(ctx.out, "Unidad actualizada correctamente")?;
        }
    }
    Ok(())
}

// === Drivers ===

impl From<DriverListArgs> for DriverFilter {
    fn from(args: DriverListArgs) -> Self {
        Self {
            name: args.name,
            national_id: args.national_id,
            license: args.license,
            status: args.status,
        }
    }
}

async fn drivers<W: Write, C: Confirm>(
    ctx: &mut Context<'_, W, C>,
    action: DriverAction,
) -> Result<()> {
    match action {
        DriverAction::List(args) => {
            let client = session_client(ctx.config)?;
            let records = DriverFilter::from(args).apply(client.list::<Driver>().await?);
            let mut table =
                Table::new(&["ID", "Nombre", "Cédula", "Licencia", "Teléfono", "Estado"]);
            for d in records {
                table.row(vec![
                    d.id,
                    d.name,
                    d.national_id,
                    d.license,
                    d.phone.unwrap_or_default(),
                    status_cell(d.status),
                ]);
            }
            table.write_to(ctx.out)?;
        }
        DriverAction::Create {
            name,
            national_id,
            license,
            phone,
            address,
            status,
        } => {
            let body = DriverForm {
                name,
                national_id,
                license,
                phone,
                address,
                status,
            }
            .into_new()?;
            let client = session_client(ctx.config)?;
            client.create::<Driver, _>(&body).await?;
            writeln!(ctx.out, "Conductor creado correctamente")?;
        }
        DriverAction::Update {
            id,
            name,
            license,
            phone,
            address,
            status,
        } => {
            let client = session_client(ctx.config)?;
            let current: Driver = fetch_one(&client, &id).await?;
            let updated = DriverEdit {
                name,
                license,
                phone,
                address,
                status,
            }
            .apply_to(&current)?;
            client.update::<Driver, _>(&id, &updated).await?;
            writeln!(ctx.out, "Conductor actualizado correctamente")?;
        }
    }
    Ok(())
}

// === Routes ===

impl From<RouteListArgs> for RouteFilter {
    fn from(args: RouteListArgs) -> Self {
        Self {
            name: args.name,
            origin: args.origin,
            destination: args.destination,
            days: args.days,
            status: args.status,
        }
    }
}

async fn routes<W: Write, C: Confirm>(
    ctx: &mut Context<'_, W, C>,
    action: RouteAction,
) -> Result<()> {
    match action {
        RouteAction::List(args) => {
            let client = session_client(ctx.config)?;
            let records = RouteFilter::from(args).apply(client.list::<Route>().await?);
            let mut table = Table::new(&[
                "ID", "Nombre", "Origen", "Destino", "Km", "Salida", "Llegada", "Días", "Estado",
            ]);
            for r in records {
                table.row(vec![
                    r.id,
                    r.name,
                    r.origin,
                    r.destination,
                    r.distance_km.to_string(),
                    display_time(r.departure.parsed()),
                    display_time(r.arrival.parsed()),
                    r.days,
                    status_cell(r.status),
                ]);
            }
            table.write_to(ctx.out)?;
        }
        RouteAction::Create {
            name,
            origin,
            destination,
            distance,
            departure,
            arrival,
            days,
            status,
        } => {
            let body = RouteForm {
                name,
                origin,
                destination,
                distance,
                departure,
                arrival,
                days,
                status,
            }
            .into_new(ctx.today)?;
            let client = session_client(ctx.config)?;
            client.create::<Route, _>(&body).await?;
            writeln!(ctx.out, "Ruta creada correctamente")?;
        }
        RouteAction::Update {
            id,
            name,
            origin,
            destination,
            distance,
            departure,
            arrival,
            days,
            status,
        } => {
            let client = session_client(ctx.config)?;
            let current: Route = fetch_one(&client, &id).await?;
            let updated = RouteEdit {
                name,
                origin,
                destination,
                distance,
                departure,
                arrival,
                days,
                status,
            }
            .apply_to(&current, ctx.today)?;
            client.update::<Route, _>(&id, &updated).await?;
            writeln!(ctx.out, "Ruta actualizada correctamente")?;
        }
    }
    Ok(())
}

// === Roles ===

async fn roles<W: Write, C: Confirm>(
    ctx: &mut Context<'_, W, C>,
    action: RoleAction,
) -> Result<()> {
    match action {
        RoleAction::List => {
            let client = session_client(ctx.config)?;
            let mut table = Table::new(&["ID", "Nombre", "Descripción"]);
            for r in client.list::<Role>().await? {
                table.row(vec![r.id, r.name, r.description]);
            }
            table.write_to(ctx.out)?;
        }
        RoleAction::Create { name, description } => {
            let body = RoleForm { name, description }.into_new()?;
            let client = session_client(ctx.config)?;
            client.create::<Role, _>(&body).await?;
            writeln!(ctx.out, "Rol creado correctamente")?;
        }
        RoleAction::Update {
            id,
            name,
            description,
        } => {
            let client = session_client(ctx.config)?;
            let current: Role = fetch_one(&client, &id).await?;
            let updated = RoleEdit { name, description }.apply_to(&current)?;
            client.update::<Role, _>(&id, &updated).await?;
            writeln!(ctx.out, "Rol actualizado correctamente")?;
        }
    }
    Ok(())
}

// === Users ===

impl From<UserListArgs> for UserFilter {
    fn from(args: UserListArgs) -> Self {
        Self {
            name: args.name,
            email: args.email,
            role_id: args.role,
            status: args.status,
        }
    }
}

async fn users<W: Write, C: Confirm>(
    ctx: &mut Context<'_, W, C>,
    action: UserAction,
) -> Result<()> {
    match action {
        UserAction::List(args) => {
            let client = session_client(ctx.config)?;
            let board = UserBoard::load(&client).await?;
            let records = UserFilter::from(args).apply(board.users);
            let mut table = Table::new(&["ID", "Nombre", "Email", "Rol", "Estado"]);
            for u in records {
                let role = role_label(&board.roles, u.role_id.as_deref());
                table.row(vec![u.id, u.name, u.email, role, status_cell(u.status)]);
            }
            table.write_to(ctx.out)?;
        }
        UserAction::Create {
            name,
            email,
            password,
            role,
        } => {
            let body = UserForm {
                name,
                email,
                password,
                role_id: role,
            }
            .into_new()?;
            let client = session_client(ctx.config)?;
            client.create::<User, _>(&body).await?;
            writeln!(ctx.out, "Usuario creado correctamente")?;
        }
        UserAction::Update {
            id,
            name,
            email,
            role,
            status,
            password,
        } => {
            let client = session_client(ctx.config)?;
            let current: User = fetch_one(&client, &id).await?;
            let body = UserEdit {
                name,
                email,
                role_id: role,
                status,
                password,
            }
            .apply_to(&current)?;
            client.update::<User, _>(&id, &body).await?;
            writeln!(ctx.out, "Usuario actualizado correctamente")?;
        }
    }
    Ok(())
}

// === Vehicle-driver assignments ===

impl From<UnitDriverListArgs> for VehicleDriverFilter {
    fn from(args: UnitDriverListArgs) -> Self {
        Self {
            vehicle_id: args.vehicle,
            driver_id: args.driver,
            status: args.status,
        }
    }
}

fn write_assignments(
    out: &mut impl Write,
    board: &VehicleDriverBoard,
    records: &[VehicleDriverAssignment],
) -> Result<()> {
    let mut table = Table::new(&["ID", "Unidad", "Conductor", "Estado"]);
    for a in records {
        table.row(vec![
            a.id.clone(),
            assignment_vehicle_label(a, &board.vehicles),
            assignment_driver_label(a, &board.drivers),
            status_cell(a.status),
        ]);
    }
    table.write_to(out)?;
    Ok(())
}

async fn unit_drivers<W: Write, C: Confirm>(
    ctx: &mut Context<'_, W, C>,
    action: UnitDriverAction,
) -> Result<()> {
    match action {
        UnitDriverAction::List(args) => {
            let client = session_client(ctx.config)?;
            let board = VehicleDriverBoard::load(&client).await?;
            let records = VehicleDriverFilter::from(args).apply(board.assignments.clone());
            write_assignments(ctx.out, &board, &records)?;
        }
        UnitDriverAction::Options => {
            let client = session_client(ctx.config)?;
            let board = VehicleDriverBoard::load(&client).await?;
            for (title, options) in [
                ("Unidades", guard::vehicle_options(&board)),
                ("Conductores", guard::driver_options(&board)),
            ] {
                writeln!(ctx.out, "{title}:")?;
                for option in options {
                    let marker = if option.already_assigned {
                        " (ya asignado)"
                    } else {
                        ""
                    };
                    writeln!(ctx.out, "  {}  {}{marker}", option.id, option.label)?;
                }
            }
        }
        UnitDriverAction::Assign {
            vehicle,
            driver,
            yes,
        } => {
            guard::validate_selection(&vehicle, &driver)?;
            let client = session_client(ctx.config)?;
            // The guard needs the full list; filters never apply here.
            let board = VehicleDriverBoard::load(&client).await?;
            let submission = if yes {
                guard::submit(&client, &board, &mut AutoConfirm, &vehicle, &driver).await?
            } else {
                guard::submit(&client, &board, &mut *ctx.confirm, &vehicle, &driver).await?
            };

            match &submission.outcome {
                Outcome::Created => {
                    writeln!(ctx.out, "Asignación creada correctamente")?;
                    match &submission.reloaded {
                        Some(fresh) => write_assignments(ctx.out, fresh, &fresh.assignments)?,
                        None => writeln!(
                            ctx.out,
                            "No se pudo actualizar la lista de asignaciones"
                        )?,
                    }
                }
                Outcome::Declined(_) => writeln!(ctx.out, "Asignación cancelada")?,
                Outcome::Blocked(decision) => {
                    if let Some(prompt) = decision.prompt() {
                        writeln!(ctx.out, "{}", prompt.title)?;
                        writeln!(ctx.out, "{}", prompt.message)?;
                    }
                }
            }
        }
        UnitDriverAction::SetStatus { id, status } => {
            let client = session_client(ctx.config)?;
            let current: VehicleDriverAssignment = fetch_one(&client, &id).await?;
            let updated = set_assignment_status(&current, &status)?;
            client
                .update::<VehicleDriverAssignment, _>(&id, &updated)
                .await?;
            writeln!(ctx.out, "Asignación actualizada correctamente")?;
        }
    }
    Ok(())
}

// === Route assignments ===

impl From<RouteAssignmentListArgs> for RouteAssignmentFilter {
    fn from(args: RouteAssignmentListArgs) -> Self {
        Self {
            vehicle_driver_id: args.unit_driver,
            route_id: args.route,
            status: args.status,
        }
    }
}

async fn route_assignments<W: Write, C: Confirm>(
    ctx: &mut Context<'_, W, C>,
    action: RouteAssignmentAction,
) -> Result<()> {
    match action {
        RouteAssignmentAction::List(args) => {
            let client = session_client(ctx.config)?;
            let board = RouteAssignmentBoard::load(&client).await?;
            let records =
                RouteAssignmentFilter::from(args).apply(board.route_assignments.clone());
            let mut table = Table::new(&["ID", "Unidad / Conductor", "Ruta", "Fecha", "Estado"]);
            for a in records {
                table.row(vec![
                    a.id.clone(),
                    resolve_assignment_label(
                        &board.vehicle_drivers,
                        &board.vehicles,
                        &board.drivers,
                        &a.vehicle_driver_id,
                    ),
                    resolve_label(&board.routes, &a.route_id),
                    display_date(a.assigned_on.parsed()),
                    status_cell(a.status),
                ]);
            }
            table.write_to(ctx.out)?;
        }
        RouteAssignmentAction::Create {
            unit_driver,
            route,
            date,
            status,
        } => {
            let body = RouteAssignmentForm {
                vehicle_driver_id: unit_driver,
                route_id: route,
                date,
                status,
            }
            .into_new(ctx.today)?;
            let client = session_client(ctx.config)?;
            client.create::<RouteAssignment, _>(&body).await?;
            writeln!(ctx.out, "Asignación de ruta creada correctamente")?;
        }
        RouteAssignmentAction::Update { id, date, status } => {
            let client = session_client(ctx.config)?;
            let current: RouteAssignment = fetch_one(&client, &id).await?;
            let updated = RouteAssignmentEdit { date, status }.apply_to(&current)?;
            client.update::<RouteAssignment, _>(&id, &updated).await?;
            writeln!(ctx.out, "Asignación de ruta actualizada correctamente")?;
        }
    }
    Ok(())
}

// === Incidents ===

impl From<IncidentListArgs> for IncidentFilter {
    fn from(args: IncidentListArgs) -> Self {
        Self {
            kind: args.kind,
            severity: args.severity,
            status: args.status,
            from: args.from,
            to: args.to,
        }
    }
}

async fn incidents<W: Write, C: Confirm>(
    ctx: &mut Context<'_, W, C>,
    action: IncidentAction,
) -> Result<()> {
    match action {
        IncidentAction::List(args) => {
            let client = session_client(ctx.config)?;
            let board = IncidentBoard::load(&client).await?;
            let records = IncidentFilter::from(args).apply(board.incidents);
            let mut table = Table::new(&[
                "ID",
                "Asignación",
                "Fecha",
                "Tipo",
                "Gravedad",
                "Descripción",
                "Estado",
            ]);
            for i in records {
                table.row(vec![
                    i.id.clone(),
                    resolve_label(&board.route_assignments, &i.route_assignment_id),
                    display_date(i.date.parsed()),
                    incident_kind_label(&i.kind).to_string(),
                    badge(
                        i.severity.as_ref().map_or("", Severity::as_wire),
                        severity_badge(i.severity.as_ref()),
                    ),
                    i.description.clone(),
                    badge(i.status.as_wire(), incident_status_badge(i.status)),
                ]);
            }
            table.write_to(ctx.out)?;
        }
        IncidentAction::Create {
            assignment,
            date,
            kind,
            severity,
            description,
        } => {
            let body = IncidentForm {
                route_assignment_id: assignment,
                date,
                kind,
                severity,
                description,
            }
            .into_new(ctx.today)?;
            let client = session_client(ctx.config)?;
            client.create::<Incident, _>(&body).await?;
            writeln!(ctx.out, "Incidencia registrada correctamente")?;
        }
        IncidentAction::Update {
            id,
            kind,
            severity,
            description,
            status,
        } => {
            let client = session_client(ctx.config)?;
            let current: Incident = fetch_one(&client, &id).await?;
            let updated = IncidentEdit {
                kind,
                severity,
                description,
                status,
            }
            .apply_to(&current)?;
            client.update::<Incident, _>(&id, &updated).await?;
            writeln!(ctx.out, "Incidencia actualizada correctamente")?;
        }
    }
    Ok(())
}
