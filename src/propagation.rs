//! # SGP4/SDP4 analytical propagation
//!
//! ## Overview
//!
//! Port of the combined SGP4/SDP4 model from the Spacetrack reports, following
//! the 2006 AIAA release by Vallado, Crawford, Hujsak and Kelso. Initialization
//! ([`sgp4_init`]) derives every coefficient the model needs from the epoch
//! elements and stores them in the record; propagation ([`sgp4`]) is a pure
//! function of the record and the elapsed minutes, so records can be shared
//! immutably across threads.
//!
//! The deep-space resonance integrator restarts from the epoch on every call
//! rather than persisting state between calls, trading a little speed for a
//! propagation step with no side effects.
//!
//! ## Units & Conventions
//!
//! Distances in Earth radii internally, km on output; angles in radians; time
//! in minutes since epoch. The per-sample error codes are:
//!
//! 1. mean eccentricity out of `[0, 1)`
//! 2. mean motion below zero
//! 3. perturbed eccentricity out of `[0, 1]`
//! 4. semi-latus rectum below zero
//! 5. unused (historical "epoch elements sub-orbital")
//! 6. satellite has decayed (`mrt < 1.0`); position and velocity stay valid
//!
//! ## See also
//!
//! * Hoots, Roehrich, NORAD Spacetrack Report #3, 1980
//! * Vallado, Crawford, Hujsak, Kelso, AIAA 2006-6753

use crate::constants::{Method, OperationMode, DEEP_SPACE_PERIOD_MIN, TWOPI};
use crate::satrec::{DerivedConstants, MeanState, Satrec};

// divisor for the divide-by-zero check on 180 deg inclination
const TEMP4: f64 = 1.5e-12;
const X2O3: f64 = 2.0 / 3.0;

/// Result of one propagation step.
///
/// `mean` carries the singly averaged mean elements recovered during the step;
/// it is `None` when the step failed before recovering them (codes 1 and 2).
#[derive(Debug, Clone, Copy)]
pub(crate) struct Outcome {
    pub error: u8,
    /// TEME position, km
    pub position: [f64; 3],
    /// TEME velocity, km/s
    pub velocity: [f64; 3],
    pub mean: Option<MeanState>,
}

impl Outcome {
    fn failed(error: u8, mean: Option<MeanState>) -> Self {
        Outcome {
            error,
            position: [f64::NAN; 3],
            velocity: [f64::NAN; 3],
            mean,
        }
    }
}

/// Remainder that is non-negative for a positive modulus.
#[inline]
fn pmod(x: f64, m: f64) -> f64 {
    x.rem_euclid(m)
}

/// Signed normalization used by the reference code for node angles: the
/// magnitude is reduced mod 2π while the sign is kept.
#[inline]
fn signed_mod_twopi(x: f64) -> f64 {
    if x >= 0.0 {
        pmod(x, TWOPI)
    } else {
        -pmod(-x, TWOPI)
    }
}

/// Greenwich sidereal time at a UT1 Julian date, radians in `[0, 2π)`.
///
/// Vallado 2004, eq. 3-45.
pub fn gstime(jdut1: f64) -> f64 {
    let tut1 = (jdut1 - 2451545.0) / 36525.0;
    let temp = -6.2e-6 * tut1 * tut1 * tut1
        + 0.093104 * tut1 * tut1
        + (876600.0 * 3600.0 + 8640184.812866) * tut1
        + 67310.54841; // sec
    pmod(temp * crate::constants::DEG2RAD / 240.0, TWOPI) // 360/86400 = 1/240
}

/// Auxiliary epoch quantities shared by the rest of initialization.
struct InitlOutput {
    no_unkozai: f64,
    ao: f64,
    con41: f64,
    con42: f64,
    cosio: f64,
    cosio2: f64,
    eccsq: f64,
    omeosq: f64,
    posq: f64,
    rp: f64,
    rteosq: f64,
    sinio: f64,
    gsto: f64,
}

/// Un-kozai the mean motion and characterize the epoch orbit.
fn initl(
    xke: f64,
    j2: f64,
    ecco: f64,
    epoch: f64,
    inclo: f64,
    no_kozai: f64,
    opsmode: OperationMode,
) -> InitlOutput {
    let eccsq = ecco * ecco;
    let omeosq = 1.0 - eccsq;
    let rteosq = omeosq.sqrt();
    let cosio = inclo.cos();
    let cosio2 = cosio * cosio;

    // un-kozai the mean motion
    let ak = (xke / no_kozai).powf(X2O3);
    let d1 = 0.75 * j2 * (3.0 * cosio2 - 1.0) / (rteosq * omeosq);
    let mut del = d1 / (ak * ak);
    let adel = ak * (1.0 - del * del - del * (1.0 / 3.0 + 134.0 * del * del / 81.0));
    del = d1 / (adel * adel);
    let no_unkozai = no_kozai / (1.0 + del);

    let ao = (xke / no_unkozai).powf(X2O3);
    let sinio = inclo.sin();
    let po = ao * omeosq;
    let con42 = 1.0 - 5.0 * cosio2;
    let con41 = -con42 - cosio2 - cosio2;
    let posq = po * po;
    let rp = ao * (1.0 - ecco);

    let gsto = match opsmode {
        OperationMode::Afspc => {
            // count integer number of days from 0 jan 1970
            let ts70 = epoch - 7305.0;
            let ds70 = (ts70 + 1.0e-8).floor();
            let tfrac = ts70 - ds70;
            let c1 = 1.72027916940703639e-2;
            let thgr70 = 1.7321343856509374;
            let fk5r = 5.07551419432269442e-15;
            let c1p2p = c1 + TWOPI;
            pmod(thgr70 + c1 * ds70 + c1p2p * tfrac + ts70 * ts70 * fk5r, TWOPI)
        }
        OperationMode::Improved => gstime(epoch + 2433281.5),
    };

    InitlOutput {
        no_unkozai,
        ao,
        con41,
        con42,
        cosio,
        cosio2,
        eccsq,
        omeosq,
        posq,
        rp,
        rteosq,
        sinio,
        gsto,
    }
}

/// Transient deep-space quantities produced by [`dscom`] and consumed by
/// [`dsinit`]; the long-lived coefficients go straight into the record's
/// derived constants.
struct DsScratch {
    sinim: f64,
    cosim: f64,
    emsq: f64,
    s1: f64,
    s2: f64,
    s3: f64,
    s4: f64,
    s5: f64,
    ss1: f64,
    ss2: f64,
    ss3: f64,
    ss4: f64,
    ss5: f64,
    sz1: f64,
    sz3: f64,
    sz11: f64,
    sz13: f64,
    sz21: f64,
    sz23: f64,
    sz31: f64,
    sz33: f64,
    z1: f64,
    z3: f64,
    z11: f64,
    z13: f64,
    z21: f64,
    z23: f64,
    z31: f64,
    z33: f64,
    em: f64,
    nm: f64,
}

/// Deep-space common items for the secular and periodic contributions of the
/// sun and moon.
fn dscom(
    k: &mut DerivedConstants,
    epoch: f64,
    ep: f64,
    argpp: f64,
    tc: f64,
    inclp: f64,
    nodep: f64,
    np: f64,
) -> DsScratch {
    const ZES: f64 = 0.01675;
    const ZEL: f64 = 0.05490;
    const C1SS: f64 = 2.9864797e-6;
    const C1L: f64 = 4.7968065e-7;
    const ZSINIS: f64 = 0.39785416;
    const ZCOSIS: f64 = 0.91744867;
    const ZCOSGS: f64 = 0.1945905;
    const ZSINGS: f64 = -0.98088458;

    let nm = np;
    let em = ep;
    let snodm = nodep.sin();
    let cnodm = nodep.cos();
    let sinomm = argpp.sin();
    let cosomm = argpp.cos();
    let sinim = inclp.sin();
    let cosim = inclp.cos();
    let emsq = em * em;
    let betasq = 1.0 - emsq;
    let rtemsq = betasq.sqrt();

    // initialize lunar solar terms
    k.peo = 0.0;
    k.pinco = 0.0;
    k.plo = 0.0;
    k.pgho = 0.0;
    k.pho = 0.0;
    let day = epoch + 18261.5 + tc / 1440.0;
    let xnodce = pmod(4.5236020 - 9.2422029e-4 * day, TWOPI);
    let stem = xnodce.sin();
    let ctem = xnodce.cos();
    let zcosil = 0.91375164 - 0.03568096 * ctem;
    let zsinil = (1.0 - zcosil * zcosil).sqrt();
    let zsinhl = 0.089683511 * stem / zsinil;
    let zcoshl = (1.0 - zsinhl * zsinhl).sqrt();
    let gam = 5.8351514 + 0.0019443680 * day;
    let mut zx = 0.39785416 * stem / zsinil;
    let zy = zcoshl * ctem + 0.91744867 * zsinhl * stem;
    zx = zx.atan2(zy);
    zx = gam + zx - xnodce;
    let zcosgl = zx.cos();
    let zsingl = zx.sin();

    // solar terms first, then swap in the lunar geometry
    let mut zcosg = ZCOSGS;
    let mut zsing = ZSINGS;
    let mut zcosi = ZCOSIS;
    let mut zsini = ZSINIS;
    let mut zcosh = cnodm;
    let mut zsinh = snodm;
    let mut cc = C1SS;
    let xnoi = 1.0 / nm;

    let (mut s1, mut s2, mut s3, mut s4, mut s5) = (0.0, 0.0, 0.0, 0.0, 0.0);
    let (mut s6, mut s7) = (0.0, 0.0);
    let (mut z1, mut z2, mut z3) = (0.0, 0.0, 0.0);
    let (mut z11, mut z12, mut z13) = (0.0, 0.0, 0.0);
    let (mut z21, mut z22, mut z23) = (0.0, 0.0, 0.0);
    let (mut z31, mut z32, mut z33) = (0.0, 0.0, 0.0);
    let (mut ss1, mut ss2, mut ss3, mut ss4, mut ss5) = (0.0, 0.0, 0.0, 0.0, 0.0);
    let (mut ss6, mut ss7) = (0.0, 0.0);
    let (mut sz1, mut sz2, mut sz3) = (0.0, 0.0, 0.0);
    let (mut sz11, mut sz12, mut sz13) = (0.0, 0.0, 0.0);
    let (mut sz21, mut sz22, mut sz23) = (0.0, 0.0, 0.0);
    let (mut sz31, mut sz32, mut sz33) = (0.0, 0.0, 0.0);

    for lsflg in 1..=2 {
        let a1 = zcosg * zcosh + zsing * zcosi * zsinh;
        let a3 = -zsing * zcosh + zcosg * zcosi * zsinh;
        let a7 = -zcosg * zsinh + zsing * zcosi * zcosh;
        let a8 = zsing * zsini;
        let a9 = zsing * zsinh + zcosg * zcosi * zcosh;
        let a10 = zcosg * zsini;
        let a2 = cosim * a7 + sinim * a8;
        let a4 = cosim * a9 + sinim * a10;
        let a5 = -sinim * a7 + cosim * a8;
        let a6 = -sinim * a9 + cosim * a10;

        let x1 = a1 * cosomm + a2 * sinomm;
        let x2 = a3 * cosomm + a4 * sinomm;
        let x3 = -a1 * sinomm + a2 * cosomm;
        let x4 = -a3 * sinomm + a4 * cosomm;
        let x5 = a5 * sinomm;
        let x6 = a6 * sinomm;
        let x7 = a5 * cosomm;
        let x8 = a6 * cosomm;

        z31 = 12.0 * x1 * x1 - 3.0 * x3 * x3;
        z32 = 24.0 * x1 * x2 - 6.0 * x3 * x4;
        z33 = 12.0 * x2 * x2 - 3.0 * x4 * x4;
        z1 = 3.0 * (a1 * a1 + a2 * a2) + z31 * emsq;
        z2 = 6.0 * (a1 * a3 + a2 * a4) + z32 * emsq;
        z3 = 3.0 * (a3 * a3 + a4 * a4) + z33 * emsq;
        z11 = -6.0 * a1 * a5 + emsq * (-24.0 * x1 * x7 - 6.0 * x3 * x5);
        z12 = -6.0 * (a1 * a6 + a3 * a5)
            + emsq * (-24.0 * (x2 * x7 + x1 * x8) - 6.0 * (x3 * x6 + x4 * x5));
        z13 = -6.0 * a3 * a6 + emsq * (-24.0 * x2 * x8 - 6.0 * x4 * x6);
        z21 = 6.0 * a2 * a5 + emsq * (24.0 * x1 * x5 - 6.0 * x3 * x7);
        z22 = 6.0 * (a4 * a5 + a2 * a6)
            + emsq * (24.0 * (x2 * x5 + x1 * x6) - 6.0 * (x4 * x7 + x3 * x8));
        z23 = 6.0 * a4 * a6 + emsq * (24.0 * x2 * x6 - 6.0 * x4 * x8);
        z1 = z1 + z1 + betasq * z31;
        z2 = z2 + z2 + betasq * z32;
        z3 = z3 + z3 + betasq * z33;
        s3 = cc * xnoi;
        s2 = -0.5 * s3 / rtemsq;
        s4 = s3 * rtemsq;
        s1 = -15.0 * em * s4;
        s5 = x1 * x3 + x2 * x4;
        s6 = x2 * x3 + x1 * x4;
        s7 = x2 * x4 - x1 * x3;

        if lsflg == 1 {
            ss1 = s1;
            ss2 = s2;
            ss3 = s3;
            ss4 = s4;
            ss5 = s5;
            ss6 = s6;
            ss7 = s7;
            sz1 = z1;
            sz2 = z2;
            sz3 = z3;
            sz11 = z11;
            sz12 = z12;
            sz13 = z13;
            sz21 = z21;
            sz22 = z22;
            sz23 = z23;
            sz31 = z31;
            sz32 = z32;
            sz33 = z33;
            zcosg = zcosgl;
            zsing = zsingl;
            zcosi = zcosil;
            zsini = zsinil;
            zcosh = zcoshl * cnodm + zsinhl * snodm;
            zsinh = snodm * zcoshl - cnodm * zsinhl;
            cc = C1L;
        }
    }

    k.zmol = pmod(4.7199672 + 0.22997150 * day - gam, TWOPI);
    k.zmos = pmod(6.2565837 + 0.017201977 * day, TWOPI);

    // solar terms
    k.se2 = 2.0 * ss1 * ss6;
    k.se3 = 2.0 * ss1 * ss7;
    k.si2 = 2.0 * ss2 * sz12;
    k.si3 = 2.0 * ss2 * (sz13 - sz11);
    k.sl2 = -2.0 * ss3 * sz2;
    k.sl3 = -2.0 * ss3 * (sz3 - sz1);
    k.sl4 = -2.0 * ss3 * (-21.0 - 9.0 * emsq) * ZES;
    k.sgh2 = 2.0 * ss4 * sz32;
    k.sgh3 = 2.0 * ss4 * (sz33 - sz31);
    k.sgh4 = -18.0 * ss4 * ZES;
    k.sh2 = -2.0 * ss2 * sz22;
    k.sh3 = -2.0 * ss2 * (sz23 - sz21);

    // lunar terms
    k.ee2 = 2.0 * s1 * s6;
    k.e3 = 2.0 * s1 * s7;
    k.xi2 = 2.0 * s2 * z12;
    k.xi3 = 2.0 * s2 * (z13 - z11);
    k.xl2 = -2.0 * s3 * z2;
    k.xl3 = -2.0 * s3 * (z3 - z1);
    k.xl4 = -2.0 * s3 * (-21.0 - 9.0 * emsq) * ZEL;
    k.xgh2 = 2.0 * s4 * z32;
    k.xgh3 = 2.0 * s4 * (z33 - z31);
    k.xgh4 = -18.0 * s4 * ZEL;
    k.xh2 = -2.0 * s2 * z22;
    k.xh3 = -2.0 * s2 * (z23 - z21);

    DsScratch {
        sinim,
        cosim,
        emsq,
        s1,
        s2,
        s3,
        s4,
        s5,
        ss1,
        ss2,
        ss3,
        ss4,
        ss5,
        sz1,
        sz3,
        sz11,
        sz13,
        sz21,
        sz23,
        sz31,
        sz33,
        z1,
        z3,
        z11,
        z13,
        z21,
        z23,
        z31,
        z33,
        em,
        nm,
    }
}

/// Deep-space long-period periodic contributions to the mean elements.
///
/// The full lunar-solar periodics apply at every time including the epoch
/// itself (the epoch offsets `peo..pho` are zeroed at initialization); the
/// elements come in and go out as a plain tuple `(e, incl, node, argp, m)`.
#[allow(clippy::too_many_arguments)]
fn dpper(
    k: &DerivedConstants,
    t: f64,
    opsmode: OperationMode,
    ep: f64,
    inclp: f64,
    nodep: f64,
    argpp: f64,
    mp: f64,
) -> (f64, f64, f64, f64, f64) {
    const ZNS: f64 = 1.19459e-5;
    const ZES: f64 = 0.01675;
    const ZNL: f64 = 1.5835218e-4;
    const ZEL: f64 = 0.05490;

    let mut ep = ep;
    let mut inclp = inclp;
    let mut nodep = nodep;
    let mut argpp = argpp;
    let mut mp = mp;

    // time varying periodics
    let mut zm = k.zmos + ZNS * t;
    let mut zf = zm + 2.0 * ZES * zm.sin();
    let mut sinzf = zf.sin();
    let mut f2 = 0.5 * sinzf * sinzf - 0.25;
    let mut f3 = -0.5 * sinzf * zf.cos();
    let ses = k.se2 * f2 + k.se3 * f3;
    let sis = k.si2 * f2 + k.si3 * f3;
    let sls = k.sl2 * f2 + k.sl3 * f3 + k.sl4 * sinzf;
    let sghs = k.sgh2 * f2 + k.sgh3 * f3 + k.sgh4 * sinzf;
    let shs = k.sh2 * f2 + k.sh3 * f3;
    zm = k.zmol + ZNL * t;
    zf = zm + 2.0 * ZEL * zm.sin();
    sinzf = zf.sin();
    f2 = 0.5 * sinzf * sinzf - 0.25;
    f3 = -0.5 * sinzf * zf.cos();
    let sel = k.ee2 * f2 + k.e3 * f3;
    let sil = k.xi2 * f2 + k.xi3 * f3;
    let sll = k.xl2 * f2 + k.xl3 * f3 + k.xl4 * sinzf;
    let sghl = k.xgh2 * f2 + k.xgh3 * f3 + k.xgh4 * sinzf;
    let shll = k.xh2 * f2 + k.xh3 * f3;
    let mut pe = ses + sel;
    let mut pinc = sis + sil;
    let mut pl = sls + sll;
    let mut pgh = sghs + sghl;
    let mut ph = shs + shll;

    pe -= k.peo;
    pinc -= k.pinco;
    pl -= k.plo;
    pgh -= k.pgho;
    ph -= k.pho;
    inclp += pinc;
    ep += pe;
    let sinip = inclp.sin();
    let cosip = inclp.cos();

    // the lyddane modification takes over below 0.2 rad (11.46 deg)
    if inclp >= 0.2 {
        ph /= sinip;
        pgh -= cosip * ph;
        argpp += pgh;
        nodep += ph;
        mp += pl;
    } else {
        let sinop = nodep.sin();
        let cosop = nodep.cos();
        let mut alfdp = sinip * sinop;
        let mut betdp = sinip * cosop;
        let dalf = ph * cosop + pinc * cosip * sinop;
        let dbet = -ph * sinop + pinc * cosip * cosop;
        alfdp += dalf;
        betdp += dbet;
        nodep = signed_mod_twopi(nodep);
        // nodep is used without a trigonometric function ahead
        if nodep < 0.0 && opsmode == OperationMode::Afspc {
            nodep += TWOPI;
        }
        let xls = mp + argpp + pl + pgh + (cosip - pinc * sinip) * nodep;
        let xnoh = nodep;
        nodep = alfdp.atan2(betdp);
        if nodep < 0.0 && opsmode == OperationMode::Afspc {
            nodep += TWOPI;
        }
        if (xnoh - nodep).abs() > std::f64::consts::PI {
            if nodep < xnoh {
                nodep += TWOPI;
            } else {
                nodep -= TWOPI;
            }
        }
        mp += pl;
        argpp = xls - mp - cosip * nodep;
    }

    (ep, inclp, nodep, argpp, mp)
}

/// Deep-space contributions to the mean motion rates: geopotential resonance
/// with half-day and one-day orbits, plus third-body secular rates.
///
/// Writes the resonance coefficients and secular rates into `k`. Only called
/// at epoch (t = tc = 0), so the reference code's secular update of the mean
/// elements collapses to a no-op here.
#[allow(clippy::too_many_arguments)]
fn dsinit(
    k: &mut DerivedConstants,
    sc: &DsScratch,
    argpo: f64,
    mo: f64,
    mdot: f64,
    no_unkozai: f64,
    nodeo: f64,
    nodedot: f64,
    xpidot: f64,
    ecco: f64,
    eccsq: f64,
    inclm: f64,
) {
    const Q22: f64 = 1.7891679e-6;
    const Q31: f64 = 2.1460748e-6;
    const Q33: f64 = 2.2123015e-7;
    const ROOT22: f64 = 1.7891679e-6;
    const ROOT44: f64 = 7.3636953e-9;
    const ROOT54: f64 = 2.1765803e-9;
    const RPTIM: f64 = 4.37526908801129966e-3; // 7.29211514668855e-5 rad/sec
    const ROOT32: f64 = 3.7393792e-7;
    const ROOT52: f64 = 1.1428639e-7;
    const ZNL: f64 = 1.5835218e-4;
    const ZNS: f64 = 1.19459e-5;

    let cosim = sc.cosim;
    let sinim = sc.sinim;
    let emsq = sc.emsq;
    let em = sc.em;
    let nm = sc.nm;

    k.irez = 0;
    if nm > 0.0034906585 && nm < 0.0052359877 {
        k.irez = 1;
    }
    if (8.26e-3..=9.24e-3).contains(&nm) && em >= 0.5 {
        k.irez = 2;
    }

    // solar terms
    let ses = sc.ss1 * ZNS * sc.ss5;
    let sis = sc.ss2 * ZNS * (sc.sz11 + sc.sz13);
    let sls = -ZNS * sc.ss3 * (sc.sz1 + sc.sz3 - 14.0 - 6.0 * emsq);
    let sghs = sc.ss4 * ZNS * (sc.sz31 + sc.sz33 - 6.0);
    let mut shs = -ZNS * sc.ss2 * (sc.sz21 + sc.sz23);
    // guard against 180 deg inclination
    if inclm < 5.2359877e-2 || inclm > std::f64::consts::PI - 5.2359877e-2 {
        shs = 0.0;
    }
    if sinim != 0.0 {
        shs /= sinim;
    }
    let sgs = sghs - cosim * shs;

    // lunar terms
    k.dedt = ses + sc.s1 * ZNL * sc.s5;
    k.didt = sis + sc.s2 * ZNL * (sc.z11 + sc.z13);
    k.dmdt = sls - ZNL * sc.s3 * (sc.z1 + sc.z3 - 14.0 - 6.0 * emsq);
    let sghl = sc.s4 * ZNL * (sc.z31 + sc.z33 - 6.0);
    let mut shll = -ZNL * sc.s2 * (sc.z21 + sc.z23);
    if inclm < 5.2359877e-2 || inclm > std::f64::consts::PI - 5.2359877e-2 {
        shll = 0.0;
    }
    k.domdt = sgs + sghl;
    k.dnodt = shs;
    if sinim != 0.0 {
        k.domdt -= cosim / sinim * shll;
        k.dnodt += shll / sinim;
    }

    // resonance effects at epoch (t = tc = 0)
    let theta = pmod(k.gsto, TWOPI);

    if k.irez != 0 {
        let aonv = (nm / k.grav.xke).powf(X2O3);

        // geopotential resonance for 12 hour orbits
        if k.irez == 2 {
            let cosisq = cosim * cosim;
            // the g-series uses the epoch eccentricity, not the averaged one
            let em = ecco;
            let emsq = eccsq;
            let eoc = em * emsq;
            let g201 = -0.306 - (em - 0.64) * 0.440;

            let (g211, g310, g322, g410, g422, g520);
            if em <= 0.65 {
                g211 = 3.616 - 13.2470 * em + 16.2900 * emsq;
                g310 = -19.302 + 117.3900 * em - 228.4190 * emsq + 156.5910 * eoc;
                g322 = -18.9068 + 109.7927 * em - 214.6334 * emsq + 146.5816 * eoc;
                g410 = -41.122 + 242.6940 * em - 471.0940 * emsq + 313.9530 * eoc;
                g422 = -146.407 + 841.8800 * em - 1629.014 * emsq + 1083.4350 * eoc;
                g520 = -532.114 + 3017.977 * em - 5740.032 * emsq + 3708.2760 * eoc;
            } else {
                g211 = -72.099 + 331.819 * em - 508.738 * emsq + 266.724 * eoc;
                g310 = -346.844 + 1582.851 * em - 2415.925 * emsq + 1246.113 * eoc;
                g322 = -342.585 + 1554.908 * em - 2366.899 * emsq + 1215.972 * eoc;
                g410 = -1052.797 + 4758.686 * em - 7193.992 * emsq + 3651.957 * eoc;
                g422 = -3581.690 + 16178.110 * em - 24462.770 * emsq + 12422.520 * eoc;
                g520 = if em > 0.715 {
                    -5149.66 + 29936.92 * em - 54087.36 * emsq + 31324.56 * eoc
                } else {
                    1464.74 - 4664.75 * em + 3763.64 * emsq
                };
            }

            let (g533, g521, g532);
            if em < 0.7 {
                g533 = -919.22770 + 4988.6100 * em - 9064.7700 * emsq + 5542.21 * eoc;
                g521 = -822.71072 + 4568.6173 * em - 8491.4146 * emsq + 5337.524 * eoc;
                g532 = -853.66600 + 4690.2500 * em - 8624.7700 * emsq + 5341.4 * eoc;
            } else {
                g533 = -37995.780 + 161616.52 * em - 229838.20 * emsq + 109377.94 * eoc;
                g521 = -51752.104 + 218913.95 * em - 309468.16 * emsq + 146349.42 * eoc;
                g532 = -40023.880 + 170470.89 * em - 242699.48 * emsq + 115605.82 * eoc;
            }

            let sini2 = sinim * sinim;
            let f220 = 0.75 * (1.0 + 2.0 * cosim + cosisq);
            let f221 = 1.5 * sini2;
            let f321 = 1.875 * sinim * (1.0 - 2.0 * cosim - 3.0 * cosisq);
            let f322 = -1.875 * sinim * (1.0 + 2.0 * cosim - 3.0 * cosisq);
            let f441 = 35.0 * sini2 * f220;
            let f442 = 39.3750 * sini2 * sini2;
            let f522 = 9.84375
                * sinim
                * (sini2 * (1.0 - 2.0 * cosim - 5.0 * cosisq)
                    + 0.33333333 * (-2.0 + 4.0 * cosim + 6.0 * cosisq));
            let f523 = sinim
                * (4.92187512 * sini2 * (-2.0 - 4.0 * cosim + 10.0 * cosisq)
                    + 6.56250012 * (1.0 + 2.0 * cosim - 3.0 * cosisq));
            let f542 = 29.53125
                * sinim
                * (2.0 - 8.0 * cosim + cosisq * (-12.0 + 8.0 * cosim + 10.0 * cosisq));
            let f543 = 29.53125
                * sinim
                * (-2.0 - 8.0 * cosim + cosisq * (12.0 + 8.0 * cosim - 10.0 * cosisq));
            let xno2 = nm * nm;
            let ainv2 = aonv * aonv;
            let mut temp1 = 3.0 * xno2 * ainv2;
            let mut temp = temp1 * ROOT22;
            k.d2201 = temp * f220 * g201;
            k.d2211 = temp * f221 * g211;
            temp1 *= aonv;
            temp = temp1 * ROOT32;
            k.d3210 = temp * f321 * g310;
            k.d3222 = temp * f322 * g322;
            temp1 *= aonv;
            temp = 2.0 * temp1 * ROOT44;
            k.d4410 = temp * f441 * g410;
            k.d4422 = temp * f442 * g422;
            temp1 *= aonv;
            temp = temp1 * ROOT52;
            k.d5220 = temp * f522 * g520;
            k.d5232 = temp * f523 * g532;
            temp = 2.0 * temp1 * ROOT54;
            k.d5421 = temp * f542 * g521;
            k.d5433 = temp * f543 * g533;
            k.xlamo = pmod(mo + nodeo + nodeo - theta - theta, TWOPI);
            k.xfact = mdot + k.dmdt + 2.0 * (nodedot + k.dnodt - RPTIM) - no_unkozai;
        }

        // synchronous resonance terms
        if k.irez == 1 {
            let g200 = 1.0 + emsq * (-2.5 + 0.8125 * emsq);
            let g310 = 1.0 + 2.0 * emsq;
            let g300 = 1.0 + emsq * (-6.0 + 6.60937 * emsq);
            let f220 = 0.75 * (1.0 + cosim) * (1.0 + cosim);
            let f311 = 0.9375 * sinim * sinim * (1.0 + 3.0 * cosim) - 0.75 * (1.0 + cosim);
            let mut f330 = 1.0 + cosim;
            f330 = 1.875 * f330 * f330 * f330;
            k.del1 = 3.0 * nm * nm * aonv * aonv;
            k.del2 = 2.0 * k.del1 * f220 * g200 * Q22;
            k.del3 = 3.0 * k.del1 * f330 * g300 * Q33 * aonv;
            k.del1 = k.del1 * f311 * g310 * Q31 * aonv;
            k.xlamo = pmod(mo + nodeo + argpo - theta, TWOPI);
            k.xfact = mdot + xpidot - RPTIM + k.dmdt + k.domdt + k.dnodt - no_unkozai;
        }
    }
}

/// Secular deep-space update: third-body rates plus the resonance integrator.
///
/// The integrator restarts from epoch (`atime = 0`) every call, matching the
/// streamline check of the reference code when no state is carried between
/// calls. Returns the updated `(em, argpm, inclm, mm, nodem, nm)`.
#[allow(clippy::too_many_arguments)]
fn dspace(
    k: &DerivedConstants,
    argpo: f64,
    argpdot: f64,
    t: f64,
    no_unkozai: f64,
    em: f64,
    argpm: f64,
    inclm: f64,
    mm: f64,
    nodem: f64,
    nm: f64,
) -> (f64, f64, f64, f64, f64, f64) {
    const FASX2: f64 = 0.13130908;
    const FASX4: f64 = 2.8843198;
    const FASX6: f64 = 0.37448087;
    const G22: f64 = 5.7686396;
    const G32: f64 = 0.95240898;
    const G44: f64 = 1.8014998;
    const G52: f64 = 1.0508330;
    const G54: f64 = 4.4108898;
    const RPTIM: f64 = 4.37526908801129966e-3;
    const STEPP: f64 = 720.0;
    const STEPN: f64 = -720.0;
    const STEP2: f64 = 259200.0;

    let tc = t;
    let theta = pmod(k.gsto + tc * RPTIM, TWOPI);
    let mut em = em + k.dedt * t;
    let mut inclm = inclm + k.didt * t;
    let mut argpm = argpm + k.domdt * t;
    let mut nodem = nodem + k.dnodt * t;
    let mut mm = mm + k.dmdt * t;
    let mut nm = nm;

    if k.irez != 0 {
        // restart the Euler-Maclaurin integrator from epoch
        let mut atime = 0.0;
        let mut xni = no_unkozai;
        let mut xli = k.xlamo;
        let mut ft = 0.0;

        let delt = if t > 0.0 { STEPP } else { STEPN };

        let (mut xndt, mut xnddt, mut xldot) = (0.0, 0.0, 0.0);
        loop {
            if k.irez != 2 {
                // near-synchronous resonance terms
                xndt = k.del1 * (xli - FASX2).sin()
                    + k.del2 * (2.0 * (xli - FASX4)).sin()
                    + k.del3 * (3.0 * (xli - FASX6)).sin();
                xldot = xni + k.xfact;
                xnddt = k.del1 * (xli - FASX2).cos()
                    + 2.0 * k.del2 * (2.0 * (xli - FASX4)).cos()
                    + 3.0 * k.del3 * (3.0 * (xli - FASX6)).cos();
                xnddt *= xldot;
            } else {
                // near-half-day resonance terms
                let xomi = argpo + argpdot * atime;
                let x2omi = xomi + xomi;
                let x2li = xli + xli;
                xndt = k.d2201 * (x2omi + xli - G22).sin()
                    + k.d2211 * (xli - G22).sin()
                    + k.d3210 * (xomi + xli - G32).sin()
                    + k.d3222 * (-xomi + xli - G32).sin()
                    + k.d4410 * (x2omi + x2li - G44).sin()
                    + k.d4422 * (x2li - G44).sin()
                    + k.d5220 * (xomi + xli - G52).sin()
                    + k.d5232 * (-xomi + xli - G52).sin()
                    + k.d5421 * (xomi + x2li - G54).sin()
                    + k.d5433 * (-xomi + x2li - G54).sin();
                xldot = xni + k.xfact;
                xnddt = k.d2201 * (x2omi + xli - G22).cos()
                    + k.d2211 * (xli - G22).cos()
                    + k.d3210 * (xomi + xli - G32).cos()
                    + k.d3222 * (-xomi + xli - G32).cos()
                    + k.d5220 * (xomi + xli - G52).cos()
                    + k.d5232 * (-xomi + xli - G52).cos()
                    + 2.0 * (k.d4410 * (x2omi + x2li - G44).cos()
                        + k.d4422 * (x2li - G44).cos()
                        + k.d5421 * (xomi + x2li - G54).cos()
                        + k.d5433 * (-xomi + x2li - G54).cos());
                xnddt *= xldot;
            }

            if (t - atime).abs() >= STEPP {
                xli += xldot * delt + xndt * STEP2;
                xni += xndt * delt + xnddt * STEP2;
                atime += delt;
            } else {
                ft = t - atime;
                break;
            }
        }

        nm = xni + xndt * ft + xnddt * ft * ft * 0.5;
        let xl = xli + xldot * ft + xndt * ft * ft * 0.5;
        let dndt;
        if k.irez != 1 {
            mm = xl - 2.0 * nodem + 2.0 * theta;
            dndt = nm - no_unkozai;
        } else {
            mm = xl - nodem - argpm + theta;
            dndt = nm - no_unkozai;
        }
        nm = no_unkozai + dndt;
    }

    (em, argpm, inclm, mm, nodem, nm)
}

/// Derive the propagation constants for `rec` and run the epoch propagation.
///
/// `epoch` is in days since 1950 Jan 0 00:00 UT. Initialization failures are
/// reported through the record's error code, never as `Err`; the record is
/// always left internally consistent.
pub(crate) fn sgp4_init(rec: &mut Satrec, epoch: f64) {
    let grav = rec.gravity_model.constants();
    let mut k = DerivedConstants::zeroed(grav);

    rec.error_code = 0;
    rec.method = Method::NearEarth;
    rec.t = 0.0;
    rec.mean_state = MeanState::default();

    let ss = 78.0 / grav.radius_earth_km + 1.0;
    let qzms2ttemp = (120.0 - 78.0) / grav.radius_earth_km;
    let qzms2t = qzms2ttemp * qzms2ttemp * qzms2ttemp * qzms2ttemp;

    let il = initl(
        grav.xke,
        grav.j2,
        rec.eccentricity,
        epoch,
        rec.inclination,
        rec.mean_motion,
        rec.operation_mode,
    );
    k.no_unkozai = il.no_unkozai;
    k.con41 = il.con41;
    k.gsto = il.gsto;
    k.a = (k.no_unkozai * grav.tumin).powf(-2.0 / 3.0);
    k.alta = k.a * (1.0 + rec.eccentricity) - 1.0;
    k.altp = k.a * (1.0 - rec.eccentricity) - 1.0;

    if il.omeosq >= 0.0 || k.no_unkozai >= 0.0 {
        k.isimp = il.rp < 220.0 / grav.radius_earth_km + 1.0;
        let mut sfour = ss;
        let mut qzms24 = qzms2t;
        let perige = (il.rp - 1.0) * grav.radius_earth_km;

        // for perigees below 156 km, s and qoms2t are altered
        if perige < 156.0 {
            sfour = perige - 78.0;
            if perige < 98.0 {
                sfour = 20.0;
            }
            let qzms24temp = (120.0 - sfour) / grav.radius_earth_km;
            qzms24 = qzms24temp * qzms24temp * qzms24temp * qzms24temp;
            sfour = sfour / grav.radius_earth_km + 1.0;
        }

        let pinvsq = 1.0 / il.posq;
        let tsi = 1.0 / (il.ao - sfour);
        k.eta = il.ao * rec.eccentricity * tsi;
        let etasq = k.eta * k.eta;
        let eeta = rec.eccentricity * k.eta;
        let psisq = (1.0 - etasq).abs();
        let coef = qzms24 * tsi.powf(4.0);
        let coef1 = coef / psisq.powf(3.5);
        let cc2 = coef1
            * k.no_unkozai
            * (il.ao * (1.0 + 1.5 * etasq + eeta * (4.0 + etasq))
                + 0.375 * grav.j2 * tsi / psisq
                    * k.con41
                    * (8.0 + 3.0 * etasq * (8.0 + etasq)));
        k.cc1 = rec.drag_term * cc2;
        let mut cc3 = 0.0;
        if rec.eccentricity > 1.0e-4 {
            cc3 = -2.0 * coef * tsi * grav.j3oj2 * k.no_unkozai * il.sinio / rec.eccentricity;
        }
        k.x1mth2 = 1.0 - il.cosio2;
        k.cc4 = 2.0
            * k.no_unkozai
            * coef1
            * il.ao
            * il.omeosq
            * (k.eta * (2.0 + 0.5 * etasq) + rec.eccentricity * (0.5 + 2.0 * etasq)
                - grav.j2 * tsi / (il.ao * psisq)
                    * (-3.0 * k.con41 * (1.0 - 2.0 * eeta + etasq * (1.5 - 0.5 * eeta))
                        + 0.75
                            * k.x1mth2
                            * (2.0 * etasq - eeta * (1.0 + etasq))
                            * (2.0 * rec.argument_of_perigee).cos()));
        k.cc5 = 2.0 * coef1 * il.ao * il.omeosq * (1.0 + 2.75 * (etasq + eeta) + eeta * etasq);
        let cosio4 = il.cosio2 * il.cosio2;
        let temp1 = 1.5 * grav.j2 * pinvsq * k.no_unkozai;
        let temp2 = 0.5 * temp1 * grav.j2 * pinvsq;
        let temp3 = -0.46875 * grav.j4 * pinvsq * pinvsq * k.no_unkozai;
        k.mdot = k.no_unkozai
            + 0.5 * temp1 * il.rteosq * k.con41
            + 0.0625 * temp2 * il.rteosq * (13.0 - 78.0 * il.cosio2 + 137.0 * cosio4);
        k.argpdot = -0.5 * temp1 * il.con42
            + 0.0625 * temp2 * (7.0 - 114.0 * il.cosio2 + 395.0 * cosio4)
            + temp3 * (3.0 - 36.0 * il.cosio2 + 49.0 * cosio4);
        let xhdot1 = -temp1 * il.cosio;
        k.nodedot = xhdot1
            + (0.5 * temp2 * (4.0 - 19.0 * il.cosio2) + 2.0 * temp3 * (3.0 - 7.0 * il.cosio2))
                * il.cosio;
        let xpidot = k.argpdot + k.nodedot;
        k.omgcof = rec.drag_term * cc3 * rec.argument_of_perigee.cos();
        k.xmcof = 0.0;
        if rec.eccentricity > 1.0e-4 {
            k.xmcof = -X2O3 * coef * rec.drag_term / eeta;
        }
        k.nodecf = 3.5 * il.omeosq * xhdot1 * k.cc1;
        k.t2cof = 1.5 * k.cc1;
        // guard the divide for inclinations of 180 deg
        if (il.cosio + 1.0).abs() > 1.5e-12 {
            k.xlcof = -0.25 * grav.j3oj2 * il.sinio * (3.0 + 5.0 * il.cosio) / (1.0 + il.cosio);
        } else {
            k.xlcof = -0.25 * grav.j3oj2 * il.sinio * (3.0 + 5.0 * il.cosio) / TEMP4;
        }
        k.aycof = -0.5 * grav.j3oj2 * il.sinio;
        let delmotemp = 1.0 + k.eta * rec.mean_anomaly.cos();
        k.delmo = delmotemp * delmotemp * delmotemp;
        k.sinmao = rec.mean_anomaly.sin();
        k.x7thm1 = 7.0 * il.cosio2 - 1.0;

        // deep space initialization
        if TWOPI / k.no_unkozai >= DEEP_SPACE_PERIOD_MIN {
            rec.method = Method::DeepSpace;
            k.isimp = true;
            let tc = 0.0;
            let inclm = rec.inclination;

            let no_unkozai = k.no_unkozai;
            let sc = dscom(
                &mut k,
                epoch,
                rec.eccentricity,
                rec.argument_of_perigee,
                tc,
                rec.inclination,
                rec.raan,
                no_unkozai,
            );

            let mdot = k.mdot;
            let no_unkozai = k.no_unkozai;
            let nodedot = k.nodedot;
            dsinit(
                &mut k,
                &sc,
                rec.argument_of_perigee,
                rec.mean_anomaly,
                mdot,
                no_unkozai,
                rec.raan,
                nodedot,
                xpidot,
                rec.eccentricity,
                il.eccsq,
                inclm,
            );
        }

        // set variables if not deep space
        if !k.isimp {
            let cc1sq = k.cc1 * k.cc1;
            k.d2 = 4.0 * il.ao * tsi * cc1sq;
            let temp = k.d2 * tsi * k.cc1 / 3.0;
            k.d3 = (17.0 * il.ao + sfour) * temp;
            k.d4 = 0.5 * temp * il.ao * tsi * (221.0 * il.ao + 31.0 * sfour) * k.cc1;
            k.t3cof = k.d2 + 2.0 * cc1sq;
            k.t4cof = 0.25 * (3.0 * k.d3 + k.cc1 * (12.0 * k.d2 + 10.0 * cc1sq));
            k.t5cof = 0.2
                * (3.0 * k.d4
                    + 12.0 * k.cc1 * k.d3
                    + 6.0 * k.d2 * k.d2
                    + 15.0 * cc1sq * (2.0 * k.d2 + cc1sq));
        }
    }

    rec.k = k;

    // propagate to zero epoch to initialize all others
    let outcome = sgp4(rec, 0.0);
    rec.error_code = outcome.error;
    if let Some(mean) = outcome.mean {
        rec.mean_state = mean;
    }
}

/// One step of the SGP4/SDP4 prediction model.
///
/// Pure function of the initialized record and the elapsed minutes; a nonzero
/// error code in the outcome follows the taxonomy in the module docs, and
/// position/velocity are NaN for codes 1 through 4.
pub(crate) fn sgp4(rec: &Satrec, tsince: f64) -> Outcome {
    let k = &rec.k;
    let grav = &k.grav;
    let vkmpersec = grav.radius_earth_km * grav.xke / 60.0;

    // update for secular gravity and atmospheric drag
    let xmdf = rec.mean_anomaly + k.mdot * tsince;
    let argpdf = rec.argument_of_perigee + k.argpdot * tsince;
    let nodedf = rec.raan + k.nodedot * tsince;
    let mut argpm = argpdf;
    let mut mm = xmdf;
    let t2 = tsince * tsince;
    let mut nodem = nodedf + k.nodecf * t2;
    let mut tempa = 1.0 - k.cc1 * tsince;
    let mut tempe = rec.drag_term * k.cc4 * tsince;
    let mut templ = k.t2cof * t2;

    if !k.isimp {
        let delomg = k.omgcof * tsince;
        let delmtemp = 1.0 + k.eta * xmdf.cos();
        let delm = k.xmcof * (delmtemp * delmtemp * delmtemp - k.delmo);
        let temp = delomg + delm;
        mm = xmdf + temp;
        argpm = argpdf - temp;
        let t3 = t2 * tsince;
        let t4 = t3 * tsince;
        tempa = tempa - k.d2 * t2 - k.d3 * t3 - k.d4 * t4;
        tempe += rec.drag_term * k.cc5 * (mm.sin() - k.sinmao);
        templ += k.t3cof * t3 + t4 * (k.t4cof + tsince * k.t5cof);
    }

    let mut nm = k.no_unkozai;
    let mut em = rec.eccentricity;
    let mut inclm = rec.inclination;
    if rec.method == Method::DeepSpace {
        let (dem, dargpm, dinclm, dmm, dnodem, dnm) = dspace(
            k,
            rec.argument_of_perigee,
            k.argpdot,
            tsince,
            k.no_unkozai,
            em,
            argpm,
            inclm,
            mm,
            nodem,
            nm,
        );
        em = dem;
        argpm = dargpm;
        inclm = dinclm;
        mm = dmm;
        nodem = dnodem;
        nm = dnm;
    }

    if nm <= 0.0 {
        return Outcome::failed(2, None);
    }

    let am = (grav.xke / nm).powf(X2O3) * tempa * tempa;
    nm = grav.xke / am.powf(1.5);
    em -= tempe;

    if em >= 1.0 || em < -0.001 {
        return Outcome::failed(1, None);
    }

    // avoid a divide by zero below
    if em < 1.0e-6 {
        em = 1.0e-6;
    }
    mm += k.no_unkozai * templ;
    let mut xlm = mm + argpm + nodem;

    nodem = signed_mod_twopi(nodem);
    argpm = pmod(argpm, TWOPI);
    xlm = pmod(xlm, TWOPI);
    mm = pmod(xlm - argpm - nodem, TWOPI);

    // recover singly averaged mean elements
    let mean = MeanState {
        semi_major_axis: am,
        eccentricity: em,
        inclination: inclm,
        raan: nodem,
        argument_of_perigee: argpm,
        mean_anomaly: mm,
        mean_motion: nm,
    };

    let sinim = inclm.sin();
    let cosim = inclm.cos();

    // add lunar-solar periodics
    let mut ep = em;
    let mut xincp = inclm;
    let mut argpp = argpm;
    let mut nodep = nodem;
    let mut mp = mm;
    let mut sinip = sinim;
    let mut cosip = cosim;

    // per-call copies: the deep-space branch recomputes these from the
    // perturbed inclination without touching the record
    let mut con41 = k.con41;
    let mut x1mth2 = k.x1mth2;
    let mut x7thm1 = k.x7thm1;
    let mut aycof = k.aycof;
    let mut xlcof = k.xlcof;

    if rec.method == Method::DeepSpace {
        let (pep, pxincp, pnodep, pargpp, pmp) =
            dpper(k, tsince, rec.operation_mode, ep, xincp, nodep, argpp, mp);
        ep = pep;
        xincp = pxincp;
        nodep = pnodep;
        argpp = pargpp;
        mp = pmp;
        if xincp < 0.0 {
            xincp = -xincp;
            nodep += std::f64::consts::PI;
            argpp -= std::f64::consts::PI;
        }
        if ep < 0.0 || ep > 1.0 {
            return Outcome::failed(3, Some(mean));
        }
    }

    // long period periodics
    if rec.method == Method::DeepSpace {
        sinip = xincp.sin();
        cosip = xincp.cos();
        aycof = -0.5 * grav.j3oj2 * sinip;
        if (cosip + 1.0).abs() > 1.5e-12 {
            xlcof = -0.25 * grav.j3oj2 * sinip * (3.0 + 5.0 * cosip) / (1.0 + cosip);
        } else {
            xlcof = -0.25 * grav.j3oj2 * sinip * (3.0 + 5.0 * cosip) / TEMP4;
        }
    }

    let axnl = ep * argpp.cos();
    let temp = 1.0 / (am * (1.0 - ep * ep));
    let aynl = ep * argpp.sin() + temp * aycof;
    let xl = mp + argpp + nodep + temp * xlcof * axnl;

    // solve kepler's equation
    let u = pmod(xl - nodep, TWOPI);
    let mut eo1 = u;
    let mut tem5: f64 = 9999.9;
    let mut ktr = 1;
    let mut sineo1 = 0.0;
    let mut coseo1 = 0.0;
    while tem5.abs() >= 1.0e-12 && ktr <= 10 {
        sineo1 = eo1.sin();
        coseo1 = eo1.cos();
        tem5 = 1.0 - coseo1 * axnl - sineo1 * aynl;
        tem5 = (u - aynl * coseo1 + axnl * sineo1 - eo1) / tem5;
        if tem5.abs() >= 0.95 {
            tem5 = if tem5 > 0.0 { 0.95 } else { -0.95 };
        }
        eo1 += tem5;
        ktr += 1;
    }

    // short period preliminary quantities
    let ecose = axnl * coseo1 + aynl * sineo1;
    let esine = axnl * sineo1 - aynl * coseo1;
    let el2 = axnl * axnl + aynl * aynl;
    let pl = am * (1.0 - el2);
    if pl < 0.0 {
        return Outcome::failed(4, Some(mean));
    }

    let rl = am * (1.0 - ecose);
    let rdotl = am.sqrt() * esine / rl;
    let rvdotl = pl.sqrt() / rl;
    let betal = (1.0 - el2).sqrt();
    let temp = esine / (1.0 + betal);
    let sinu = am / rl * (sineo1 - aynl - axnl * temp);
    let cosu = am / rl * (coseo1 - axnl + aynl * temp);
    let mut su = sinu.atan2(cosu);
    let sin2u = (cosu + cosu) * sinu;
    let cos2u = 1.0 - 2.0 * sinu * sinu;
    let temp = 1.0 / pl;
    let temp1 = 0.5 * grav.j2 * temp;
    let temp2 = temp1 * temp;

    // update for short period periodics
    if rec.method == Method::DeepSpace {
        let cosisq = cosip * cosip;
        con41 = 3.0 * cosisq - 1.0;
        x1mth2 = 1.0 - cosisq;
        x7thm1 = 7.0 * cosisq - 1.0;
    }

    let mrt = rl * (1.0 - 1.5 * temp2 * betal * con41) + 0.5 * temp1 * x1mth2 * cos2u;
    su -= 0.25 * temp2 * x7thm1 * sin2u;
    let xnode = nodep + 1.5 * temp2 * cosip * sin2u;
    let xinc = xincp + 1.5 * temp2 * cosip * sinip * cos2u;
    let mvt = rdotl - nm * temp1 * x1mth2 * sin2u / grav.xke;
    let rvdot = rvdotl + nm * temp1 * (x1mth2 * cos2u + 1.5 * con41) / grav.xke;

    // orientation vectors
    let sinsu = su.sin();
    let cossu = su.cos();
    let snod = xnode.sin();
    let cnod = xnode.cos();
    let sini = xinc.sin();
    let cosi = xinc.cos();
    let xmx = -snod * cosi;
    let xmy = cnod * cosi;
    let ux = xmx * sinsu + cnod * cossu;
    let uy = xmy * sinsu + snod * cossu;
    let uz = sini * sinsu;
    let vx = xmx * cossu - cnod * sinsu;
    let vy = xmy * cossu - snod * sinsu;
    let vz = sini * cossu;

    // position and velocity in km and km/sec
    let mr = mrt * grav.radius_earth_km;
    let position = [mr * ux, mr * uy, mr * uz];
    let velocity = [
        (mvt * ux + rvdot * vx) * vkmpersec,
        (mvt * uy + rvdot * vy) * vkmpersec,
        (mvt * uz + rvdot * vz) * vkmpersec,
    ];

    // decaying satellites still get a valid state vector
    let error = if mrt < 1.0 { 6 } else { 0 };

    Outcome {
        error,
        position,
        velocity,
        mean: Some(mean),
    }
}
