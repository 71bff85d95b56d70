use criterion::{black_box, criterion_group, criterion_main, Criterion};
use uscript_parser::parse_source;

// A medium-size class (~90 lines) with most declaration kinds
const CLASS_SOURCE: &str = r#"
//=============================================================================
// Weapon base class.
//=============================================================================
class BenchWeapon extends Engine.Inventory
    native
    config(Game)
    abstract;

#exec TEXTURE IMPORT NAME=BenchIcon FILE=Textures\Icon.pcx

const MAX_AMMO = 200;
const RELOAD_TIME = 1.5;

enum EFireMode
{
    FM_Single,
    FM_Burst,
    FM_Auto
};

struct native AmmoSlot
{
    var() int Count;
    var() float Weight;

    structdefaultproperties
    {
        Count=10
        Weight=0.5
    }
};

var() config int Ammo;
var() EFireMode FireMode;
var AmmoSlot Slots[MAX_AMMO];
var array<Actor> Targets;
var transient bool bReloading;

replication
{
    reliable if (Role == ROLE_Authority)
        Ammo, FireMode;
    unreliable if (bNetDirty && Role < ROLE_Authority)
        ServerFire;
}

function bool HasAmmo()
{
    return Ammo > 0;
}

simulated function Fire(optional float Value)
{
    local int i, Shots;

    if (!HasAmmo())
        return;

    switch (FireMode)
    {
        case FM_Single:
            Shots = 1;
            break;
        case FM_Burst:
            Shots = 3;
            break;
        default:
            Shots = 1;
    }

    for (i = 0; i < Shots; i++)
    {
        Ammo--;
        SpawnProjectile(Location, Rotation);
    }
}

state Reloading
{
    ignores Fire;

    function EndState()
    {
        bReloading = false;
    }

Begin:
    bReloading = true;
    Sleep(RELOAD_TIME);
    Ammo = MAX_AMMO;
    GotoState('');
}

defaultproperties
{
    Ammo=50
    FireMode=FM_Single
    Slots(0)=(Count=5,Weight=1.0)
    Begin Object Class=StaticMeshComponent Name=PickupMesh
        StaticMesh=StaticMesh'Weapons.Rifle'
    End Object
    Components.Add(PickupMesh)
}
"#;

fn bench_parse_class(c: &mut Criterion) {
    c.bench_function("parse_class", |b| {
        b.iter(|| {
            let ast = parse_source(black_box(CLASS_SOURCE));
            black_box(ast.functions.len());
        });
    });
}

fn bench_parse_large(c: &mut Criterion) {
    let source = CLASS_SOURCE.repeat(20);
    c.bench_function("parse_large_repeated", |b| {
        b.iter(|| {
            let ast = parse_source(black_box(&source));
            black_box(ast.errors.len());
        });
    });
}

criterion_group!(benches, bench_parse_class, bench_parse_large);
criterion_main!(benches);
